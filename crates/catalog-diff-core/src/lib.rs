//! Schema comparison engine for relational catalogs.
//!
//! `catalog-diff-core` compares the metadata of two catalogs, "local" and
//! "remote", and reports:
//!
//! - objects present in remote but missing from local,
//! - objects present in local but not in remote,
//! - column discrepancies of tables present in both.
//!
//! Column discrepancies are rendered either as `ALTER TABLE` statements
//! that would bring local in line with remote ([`DiffMode::Statement`]) or
//! as `+`/`-` lines over full column renderings ([`DiffMode::Text`]).
//!
//! # Architecture
//!
//! - **Reader** - the [`CatalogReader`] seam implemented by driver crates
//! - **Comparer** - concurrent fetch orchestration ([`SchemaComparer`])
//! - **Compare** - pure object and column set differences
//! - **Report** - bannered text or JSON output ([`Reporter`])
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog_diff_core::prelude::*;
//!
//! let comparer = SchemaComparer::new(Arc::new(local), Arc::new(remote), CompareOptions::new());
//! let comparison = comparer.compare().await?;
//! Reporter::new(std::io::stdout().lock()).render(&comparison)?;
//! ```

pub mod compare;
pub mod comparer;
pub mod error;
pub mod model;
pub mod options;
pub mod reader;
pub mod report;

pub use comparer::{Comparison, SchemaComparer};
pub use error::{BoxError, CompareError, Result};
pub use options::{ColumnFetch, CompareOptions, DiffMode};
pub use reader::{BoxFuture, CatalogReader, ColumnScope, ObjectFilter};
pub use regex::Regex;
pub use report::Reporter;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compare::{ObjectDiff, column_diff, eligible_tables, object_diff};
    pub use crate::comparer::{Comparison, SchemaComparer};
    pub use crate::error::{CompareError, Result};
    pub use crate::model::{CatalogObject, ColumnDescriptor, ColumnIndex, TableDiff};
    pub use crate::options::{ColumnFetch, CompareOptions, DiffMode};
    pub use crate::reader::{BoxFuture, CatalogReader, ColumnScope, ObjectFilter};
    pub use crate::report::Reporter;
}
