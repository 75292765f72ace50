//! Declared-type normalization.
//!
//! SQLite keeps column types as free text (`varchar( 50 )`, `Integer`, or
//! nothing at all). Two catalogs declaring the same type in different
//! spellings must produce the same signature.

/// Base type used for columns declared without a type (BLOB affinity).
pub const UNDECLARED_TYPE: &str = "BLOB";

/// Normalizes a declared column type.
///
/// The type is upper-cased, whitespace runs collapse to one space, and
/// whitespace next to parentheses and commas is removed.
#[must_use]
pub fn normalize_declared_type(declared: &str) -> String {
    let mut out = String::with_capacity(declared.len());
    let mut pending_space = false;
    for ch in declared.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !matches!(ch, '(' | ')' | ',') && !out.ends_with(['(', ',']) {
            out.push(' ');
        }
        pending_space = false;
        out.extend(ch.to_uppercase());
    }
    if out.is_empty() {
        UNDECLARED_TYPE.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase() {
        assert_eq!(normalize_declared_type("integer"), "INTEGER");
    }

    #[test]
    fn test_parentheses_and_commas() {
        assert_eq!(normalize_declared_type("numeric( 10 , 2 )"), "NUMERIC(10,2)");
        assert_eq!(normalize_declared_type("VARCHAR (50)"), "VARCHAR(50)");
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(
            normalize_declared_type("  double   precision "),
            "DOUBLE PRECISION"
        );
        assert_eq!(
            normalize_declared_type("unsigned big  int"),
            "UNSIGNED BIG INT"
        );
    }

    #[test]
    fn test_undeclared() {
        assert_eq!(normalize_declared_type(""), UNDECLARED_TYPE);
        assert_eq!(normalize_declared_type("   "), UNDECLARED_TYPE);
    }
}
