//! catalog-diff CLI
//!
//! Command-line tool comparing the schema catalogs of two SQLite databases.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use catalog_diff::{PoolSettings, connect};
use catalog_diff_core::options::{DEFAULT_MAX_CONCURRENCY, DEFAULT_NAME_PATTERN};
use catalog_diff_core::prelude::*;

/// Compare the schemas of a local and a remote database.
#[derive(Parser, Debug)]
#[command(name = "catalog-diff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Local database URL.
    #[arg(env = "LOCAL_DATABASE_URL")]
    local: String,

    /// Remote database URL.
    #[arg(env = "REMOTE_DATABASE_URL")]
    remote: String,

    /// Object types to compare (repeatable; TABLE, PACKAGE, SEQUENCE and SYNONYM if omitted).
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Regular expression object names must match (empty matches everything).
    #[arg(short, long, default_value = DEFAULT_NAME_PATTERN)]
    pattern: String,

    /// How column differences are rendered.
    #[arg(short, long, value_enum, default_value_t = Mode::Statement)]
    mode: Mode,

    /// How column metadata is fetched.
    #[arg(long, value_enum, default_value_t = Columns::OnDemand)]
    columns: Columns,

    /// Maximum number of tables compared concurrently.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    concurrency: usize,

    /// Maximum number of connections per database.
    #[arg(long, default_value_t = 8)]
    max_connections: u32,

    /// Deadline for the whole comparison, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// `ALTER TABLE` statements.
    Statement,
    /// `+`/`-` column lines.
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Columns {
    /// Query each candidate table separately.
    OnDemand,
    /// Query all matching columns once per database.
    Bulk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Bannered text sections.
    Text,
    /// JSON document.
    Json,
}

impl Cli {
    fn compare_options(&self) -> CompareOptions {
        CompareOptions::new()
            .object_types(self.types.iter().map(|t| t.to_uppercase()))
            .name_pattern(self.pattern.clone())
            .diff_mode(match self.mode {
                Mode::Statement => DiffMode::Statement,
                Mode::Text => DiffMode::Text,
            })
            .column_fetch(match self.columns {
                Columns::OnDemand => ColumnFetch::OnDemand,
                Columns::Bulk => ColumnFetch::Bulk,
            })
            .max_concurrency(self.concurrency)
    }

    fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            ..PoolSettings::default()
        }
    }
}

async fn run(cli: &Cli) -> catalog_diff_core::Result<Comparison> {
    let settings = cli.pool_settings();
    let (local, remote) = tokio::try_join!(
        connect("local", &cli.local, &settings),
        connect("remote", &cli.remote, &settings),
    )?;

    let local = Arc::new(local);
    let remote = Arc::new(remote);
    let comparer = SchemaComparer::new(
        Arc::clone(&local),
        Arc::clone(&remote),
        cli.compare_options(),
    );
    let result = comparer.compare().await;

    local.close().await;
    remote.close().await;
    result
}

/// Runs `comparison` until it finishes, `deadline` passes, or Ctrl-C arrives.
///
/// Dropping the comparison on deadline or interrupt aborts its table tasks.
async fn run_until<F>(deadline: Duration, comparison: F) -> catalog_diff_core::Result<Comparison>
where
    F: Future<Output = catalog_diff_core::Result<Comparison>> + Send,
{
    tokio::select! {
        outcome = tokio::time::timeout(deadline, comparison) => {
            outcome.unwrap_or_else(|_| {
                Err(CompareError::Cancelled(format!(
                    "deadline of {}s exceeded",
                    deadline.as_secs()
                )))
            })
        }
        _ = tokio::signal::ctrl_c() => {
            Err(CompareError::Cancelled("interrupted".to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the report
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let comparison = run_until(Duration::from_secs(cli.timeout), run(&cli)).await?;

    info!(
        missing = comparison.missing_from_local.len(),
        extraneous = comparison.extraneous_in_local.len(),
        tables = comparison.table_diffs.len(),
        "Comparison finished"
    );

    let mut reporter = Reporter::new(std::io::stdout().lock());
    match cli.format {
        Format::Text => reporter.render(&comparison)?,
        Format::Json => reporter.render_json(&comparison)?,
    }

    Ok(())
}
