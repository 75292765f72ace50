//! Catalog metadata types.
//!
//! Everything here is fetch-scoped: values are created while scanning query
//! rows and discarded once the report has been written.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Object type eligible for column comparison.
pub const TABLE_TYPE: &str = "TABLE";

/// A named, typed catalog entity (table, index, sequence, ...).
///
/// Identity is the `(name, type)` pair, compared exactly as returned by the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CatalogObject {
    /// Object name.
    pub name: String,
    /// Object type, e.g. `TABLE`.
    #[serde(rename = "type")]
    pub object_type: String,
}

impl CatalogObject {
    /// Creates a new catalog object.
    #[must_use]
    pub fn new(name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
        }
    }

    /// Creates a `TABLE` object.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::new(name, TABLE_TYPE)
    }

    /// Returns whether this object is a table.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.object_type == TABLE_TYPE
    }
}

impl fmt::Display for CatalogObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.object_type)
    }
}

/// A single column of a table as seen by one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Label of the catalog this column was read from.
    pub schema_label: String,
    /// Owning table.
    pub table: String,
    /// Column name, unique within the table.
    pub name: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Normalized type rendering, with a ` NOT NULL` suffix when not nullable.
    pub type_signature: String,
}

impl ColumnDescriptor {
    /// Creates a column descriptor, deriving the signature from the base type.
    #[must_use]
    pub fn new(
        schema_label: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        base_type: &str,
        nullable: bool,
    ) -> Self {
        Self {
            schema_label: schema_label.into(),
            table: table.into(),
            name: name.into(),
            nullable,
            type_signature: type_signature(base_type, nullable),
        }
    }

    /// Renders the column as `<name> <typeSignature>`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} {}", self.name, self.type_signature)
    }
}

/// Builds a type signature from a normalized base type and nullability.
#[must_use]
pub fn type_signature(base_type: &str, nullable: bool) -> String {
    if nullable {
        base_type.to_string()
    } else {
        format!("{base_type} NOT NULL")
    }
}

/// Column differences for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDiff {
    /// Table name.
    pub table: String,
    /// Rendered diff, never empty.
    pub diff_text: String,
}

/// Immutable `table -> columns` mapping for one catalog.
///
/// Built by a single owner from an ordered column listing and shared
/// read-only afterwards. Grouping is by explicit key, so the input does not
/// have to be clustered by table.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    tables: BTreeMap<String, Vec<ColumnDescriptor>>,
}

impl ColumnIndex {
    /// Returns the columns of `table`, or an empty slice when unknown.
    #[must_use]
    pub fn columns(&self, table: &str) -> &[ColumnDescriptor] {
        self.tables.get(table).map_or(&[], Vec::as_slice)
    }

    /// Number of tables in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns whether the index holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<ColumnDescriptor> for ColumnIndex {
    fn from_iter<I: IntoIterator<Item = ColumnDescriptor>>(iter: I) -> Self {
        let mut tables: BTreeMap<String, Vec<ColumnDescriptor>> = BTreeMap::new();
        for column in iter {
            tables.entry(column.table.clone()).or_default().push(column);
        }
        Self { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_signature_suffix() {
        assert_eq!(type_signature("NUMBER(10,0)", false), "NUMBER(10,0) NOT NULL");
        assert_eq!(type_signature("DATE", true), "DATE");
    }

    #[test]
    fn test_render_column() {
        let col = ColumnDescriptor::new("local", "T_A", "NAME", "VARCHAR2(50)", true);
        assert_eq!(col.render(), "NAME VARCHAR2(50)");
    }

    #[test]
    fn test_object_display() {
        assert_eq!(CatalogObject::table("R_X").to_string(), "R_X TABLE");
        assert!(!CatalogObject::new("R_SEQ", "SEQUENCE").is_table());
    }

    #[test]
    fn test_column_index_groups_interleaved_rows() {
        let index: ColumnIndex = vec![
            ColumnDescriptor::new("local", "B", "ID", "INTEGER", false),
            ColumnDescriptor::new("local", "A", "ID", "INTEGER", false),
            ColumnDescriptor::new("local", "B", "NAME", "TEXT", true),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.len(), 2);
        assert_eq!(index.columns("B").len(), 2);
        assert_eq!(index.columns("A").len(), 1);
        assert!(index.columns("C").is_empty());
    }
}
