//! Catalog reader seam.
//!
//! Driver crates implement [`CatalogReader`] to list objects and columns of
//! a live catalog. The core only defines the trait so it stays
//! driver-agnostic.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use regex::Regex;

use crate::error::Result;
use crate::model::{CatalogObject, ColumnDescriptor};

/// Boxed future type for catalog reads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Selects which objects a catalog lists.
#[derive(Debug, Clone)]
pub struct ObjectFilter {
    types: BTreeSet<String>,
    pattern: Regex,
}

impl ObjectFilter {
    /// Creates a filter from a type set and a name pattern.
    #[must_use]
    pub const fn new(types: BTreeSet<String>, pattern: Regex) -> Self {
        Self { types, pattern }
    }

    /// Object types to list.
    #[must_use]
    pub const fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    /// Pattern object names must match.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the type set in delimited membership form, e.g. `,SEQUENCE,TABLE,`.
    #[must_use]
    pub fn joined_types(&self) -> String {
        let mut joined = String::from(",");
        for t in &self.types {
            joined.push_str(t);
            joined.push(',');
        }
        joined
    }

    /// Returns whether an object passes this filter.
    #[must_use]
    pub fn accepts(&self, name: &str, object_type: &str) -> bool {
        self.types.contains(object_type) && self.pattern.is_match(name)
    }
}

/// Which tables a column listing covers.
#[derive(Debug, Clone, Copy)]
pub enum ColumnScope<'a> {
    /// Exactly one table, by name.
    Table(&'a str),
    /// Every table whose name matches the pattern.
    Matching(&'a Regex),
}

impl ColumnScope<'_> {
    /// Returns whether `table` falls inside this scope.
    #[must_use]
    pub fn includes(&self, table: &str) -> bool {
        match self {
            Self::Table(name) => *name == table,
            Self::Matching(pattern) => pattern.is_match(table),
        }
    }
}

/// Reads object and column metadata from one catalog.
///
/// Implementations must:
/// - return objects ordered by `(name, type)` and columns ordered by
///   `(table, name)`;
/// - report an empty listing as `Ok(vec![])`, never as an error;
/// - stop promptly when the returned future is dropped.
pub trait CatalogReader: Send + Sync {
    /// Label of this catalog (`local` or `remote`).
    fn label(&self) -> &str;

    /// Lists the objects accepted by `filter`.
    fn fetch_objects<'a>(&'a self, filter: &'a ObjectFilter)
        -> BoxFuture<'a, Result<Vec<CatalogObject>>>;

    /// Lists the columns of the tables in `scope`.
    fn fetch_columns<'a>(&'a self, scope: ColumnScope<'a>)
        -> BoxFuture<'a, Result<Vec<ColumnDescriptor>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(types: &[&str], pattern: &str) -> ObjectFilter {
        ObjectFilter::new(
            types.iter().map(|t| (*t).to_string()).collect(),
            Regex::new(pattern).unwrap(),
        )
    }

    #[test]
    fn test_joined_types() {
        assert_eq!(filter(&["TABLE", "INDEX"], ".").joined_types(), ",INDEX,TABLE,");
        assert_eq!(filter(&[], ".").joined_types(), ",");
    }

    #[test]
    fn test_accepts() {
        let f = filter(&["TABLE"], "^R_");
        assert!(f.accepts("R_A", "TABLE"));
        assert!(!f.accepts("R_A", "INDEX"));
        assert!(!f.accepts("X_A", "TABLE"));
    }

    #[test]
    fn test_column_scope() {
        let re = Regex::new("^T_").unwrap();
        assert!(ColumnScope::Matching(&re).includes("T_X"));
        assert!(!ColumnScope::Matching(&re).includes("R_X"));
        assert!(ColumnScope::Table("T_X").includes("T_X"));
        assert!(!ColumnScope::Table("T_X").includes("T_XY"));
    }
}
