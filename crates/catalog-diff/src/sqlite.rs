//! SQLite catalog reader.
//!
//! Objects come from `sqlite_master`, columns from `pragma_table_info`.
//! SQLite ships no `REGEXP` function, so the name pattern is applied to the
//! fetched rows.

use std::str::FromStr;
use std::time::Duration;

use catalog_diff_core::model::{CatalogObject, ColumnDescriptor};
use catalog_diff_core::{
    BoxFuture, CatalogReader, ColumnScope, CompareError, ObjectFilter, Result,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::types::normalize_declared_type;

/// Name every SQLite auto-index collapses to.
///
/// Auto-index names embed the table name and a sequence number chosen by
/// SQLite, so they never match across two databases.
pub const AUTOINDEX_NAME: &str = "sqlite_autoindex";

/// Lists objects whose upper-cased type is in the delimited set `?1`.
pub const OBJECTS_SQL: &str = r"SELECT name, upper(type)
  FROM sqlite_master
  WHERE instr(?1, ',' || upper(type) || ',') > 0
    AND (name NOT LIKE 'sqlite\_%' ESCAPE '\' OR name LIKE 'sqlite\_autoindex\_%' ESCAPE '\')
  ORDER BY 1, 2";

/// Lists the columns of table `?1`.
pub const TABLE_COLUMNS_SQL: &str = r#"SELECT m.name, p.name, p.type, p."notnull"
  FROM sqlite_master AS m
  JOIN pragma_table_info(m.name) AS p
  WHERE m.type = 'table' AND m.name = ?1
  ORDER BY 1, 2"#;

/// Lists the columns of every user table.
pub const ALL_COLUMNS_SQL: &str = r#"SELECT m.name, p.name, p.type, p."notnull"
  FROM sqlite_master AS m
  JOIN pragma_table_info(m.name) AS p
  WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
  ORDER BY 1, 2"#;

/// Connection pool settings for one catalog.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum number of open connections.
    pub max_connections: u32,
    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 8,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Opens a read-only pool on `url` and wraps it in a catalog reader.
///
/// # Errors
///
/// Returns [`CompareError::Connection`] when the URL is invalid or the
/// database cannot be opened.
pub async fn connect(label: &str, url: &str, settings: &PoolSettings) -> Result<SqliteCatalog> {
    let unreachable = |err: sqlx::Error| CompareError::Connection {
        catalog: label.to_string(),
        source: Box::new(err),
    };

    let options = SqliteConnectOptions::from_str(url)
        .map_err(unreachable)?
        .read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .min_connections(0)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(unreachable)?;

    debug!(catalog = label, url = url, "Connected");
    Ok(SqliteCatalog::new(label, pool))
}

/// A SQLite database read as a catalog.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    label: String,
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(label: impl Into<String>, pool: SqlitePool) -> Self {
        Self {
            label: label.into(),
            pool,
        }
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn error(&self, query: &str, err: sqlx::Error) -> CompareError {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => CompareError::Connection {
                catalog: self.label.clone(),
                source: Box::new(err),
            },
            other => CompareError::Query {
                catalog: self.label.clone(),
                query: query.to_string(),
                source: Box::new(other),
            },
        }
    }

    async fn objects(&self, filter: &ObjectFilter) -> Result<Vec<CatalogObject>> {
        debug!(catalog = %self.label, types = %filter.joined_types(), "Listing objects");
        let rows: Vec<(String, String)> = sqlx::query_as(OBJECTS_SQL)
            .bind(filter.joined_types())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.error(OBJECTS_SQL, e))?;

        let mut objects: Vec<CatalogObject> = rows
            .into_iter()
            .filter(|(name, object_type)| filter.accepts(name, object_type))
            .map(|(name, object_type)| {
                let name = collapse_system_name(name, &object_type);
                CatalogObject::new(name, object_type)
            })
            .collect();
        objects.sort();
        objects.dedup();
        Ok(objects)
    }

    async fn columns(&self, scope: ColumnScope<'_>) -> Result<Vec<ColumnDescriptor>> {
        let (sql, rows) = match scope {
            ColumnScope::Table(table) => {
                debug!(catalog = %self.label, table = table, "Listing table columns");
                let rows: Vec<(String, String, String, i64)> = sqlx::query_as(TABLE_COLUMNS_SQL)
                    .bind(table)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| self.error(TABLE_COLUMNS_SQL, e))?;
                (TABLE_COLUMNS_SQL, rows)
            }
            ColumnScope::Matching(_) => {
                debug!(catalog = %self.label, "Listing all columns");
                let rows: Vec<(String, String, String, i64)> = sqlx::query_as(ALL_COLUMNS_SQL)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| self.error(ALL_COLUMNS_SQL, e))?;
                (ALL_COLUMNS_SQL, rows)
            }
        };
        debug!(catalog = %self.label, rows = rows.len(), sql = sql, "Fetched columns");

        Ok(rows
            .into_iter()
            .filter(|(table, ..)| scope.includes(table))
            .map(|(table, name, declared, not_null)| {
                ColumnDescriptor::new(
                    self.label.as_str(),
                    table,
                    name,
                    &normalize_declared_type(&declared),
                    not_null == 0,
                )
            })
            .collect())
    }
}

fn collapse_system_name(name: String, object_type: &str) -> String {
    if object_type == "INDEX" && name.starts_with("sqlite_autoindex_") {
        AUTOINDEX_NAME.to_string()
    } else {
        name
    }
}

impl CatalogReader for SqliteCatalog {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch_objects<'a>(
        &'a self,
        filter: &'a ObjectFilter,
    ) -> BoxFuture<'a, Result<Vec<CatalogObject>>> {
        Box::pin(self.objects(filter))
    }

    fn fetch_columns<'a>(
        &'a self,
        scope: ColumnScope<'a>,
    ) -> BoxFuture<'a, Result<Vec<ColumnDescriptor>>> {
        Box::pin(self.columns(scope))
    }
}
