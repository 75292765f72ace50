#![allow(dead_code)]

use std::path::Path;
use std::str::FromStr;

use catalog_diff::{PoolSettings, SqliteCatalog, connect};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Creates a database file at `path` containing the given DDL.
pub async fn create_database(path: &Path, ddl: &[&str]) -> String {
    let url = format!("sqlite://{}", path.display());
    let options = SqliteConnectOptions::from_str(&url)
        .expect("valid SQLite URL")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap_or_else(|e| panic!("Failed to create {url}: {e}"));
    for sql in ddl {
        sqlx::query(sql)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to run {sql}: {e}"));
    }
    pool.close().await;
    url
}

/// Opens a catalog reader on an existing database file.
pub async fn open_catalog(label: &str, url: &str, max_connections: u32) -> SqliteCatalog {
    let settings = PoolSettings {
        max_connections,
        ..PoolSettings::default()
    };
    connect(label, url, &settings)
        .await
        .unwrap_or_else(|e| panic!("Failed to open {url}: {e}"))
}
