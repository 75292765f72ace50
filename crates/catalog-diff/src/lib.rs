//! # catalog-diff
//!
//! SQLite catalog reader for `catalog-diff-core`, plus the `catalog-diff`
//! command-line tool.
//!
//! # How SQLite catalogs are read
//!
//! - **Objects** come from `sqlite_master`. Types are upper-cased (`TABLE`,
//!   `INDEX`, `VIEW`, `TRIGGER`) and SQLite-internal objects are hidden.
//! - **Auto-indexes** created for `UNIQUE` and `PRIMARY KEY` constraints are
//!   reported under one collapsed name, since SQLite numbers them per table.
//! - **Columns** come from `pragma_table_info`. Declared types are
//!   normalized (see [`types::normalize_declared_type`]) and `NOT NULL`
//!   columns carry a ` NOT NULL` suffix in their signature.
//! - **Name patterns** are applied client-side with the `regex` crate.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog_diff::{PoolSettings, connect};
//! use catalog_diff_core::prelude::*;
//!
//! let settings = PoolSettings::default();
//! let local = connect("local", "sqlite://local.db", &settings).await?;
//! let remote = connect("remote", "sqlite://remote.db", &settings).await?;
//!
//! let comparer = SchemaComparer::new(Arc::new(local), Arc::new(remote), CompareOptions::new());
//! let comparison = comparer.compare().await?;
//! Reporter::new(std::io::stdout().lock()).render(&comparison)?;
//! ```

pub mod sqlite;
pub mod types;

pub use sqlite::{PoolSettings, SqliteCatalog, connect};
