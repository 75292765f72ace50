//! Error types for the comparison engine.

/// Boxed error coming from a catalog driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while comparing two catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// The catalog could not be reached.
    #[error("{catalog} catalog unreachable: {source}")]
    Connection {
        /// Label of the catalog that failed.
        catalog: String,
        /// Driver error.
        #[source]
        source: BoxError,
    },

    /// The catalog rejected a query.
    #[error("{catalog} catalog rejected query: {source}\n{query}")]
    Query {
        /// Label of the catalog that failed.
        catalog: String,
        /// The offending query text.
        query: String,
        /// Driver error.
        #[source]
        source: BoxError,
    },

    /// The run was cancelled before it completed (deadline or interrupt).
    #[error("comparison cancelled: {0}")]
    Cancelled(String),

    /// A per-table column fetch failed.
    #[error("table {table}: {source}")]
    Table {
        /// The table whose columns could not be compared.
        table: String,
        /// Underlying failure.
        #[source]
        source: Box<Self>,
    },

    /// A worker task panicked or was aborted.
    #[error("worker task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// The object name pattern is not a valid regular expression.
    #[error("invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the report failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompareError {
    /// Tags this error with the table whose comparison produced it.
    #[must_use]
    pub fn for_table(self, table: impl Into<String>) -> Self {
        Self::Table {
            table: table.into(),
            source: Box::new(self),
        }
    }

    /// Returns whether this error (or the error it wraps) is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled(_) => true,
            Self::Table { source, .. } => source.is_cancelled(),
            Self::TaskFailed(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_tag_in_message() {
        let err = CompareError::Query {
            catalog: "remote".to_string(),
            query: "SELECT 1".to_string(),
            source: "no such table".into(),
        }
        .for_table("R_ORDERS");

        let msg = err.to_string();
        assert!(msg.starts_with("table R_ORDERS: remote catalog rejected query"));
        assert!(msg.contains("SELECT 1"));
    }

    #[test]
    fn test_is_cancelled_sees_through_table_tag() {
        let err = CompareError::Cancelled("deadline exceeded".to_string()).for_table("T_A");
        assert!(err.is_cancelled());

        let err = CompareError::Connection {
            catalog: "local".to_string(),
            source: "refused".into(),
        };
        assert!(!err.is_cancelled());
    }
}
