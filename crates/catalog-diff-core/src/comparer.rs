//! Metadata fetch orchestration.
//!
//! [`SchemaComparer`] drives a full comparison run:
//!
//! 1. Both object lists are fetched concurrently. The first failure wins and
//!    the sibling fetch is dropped, so no partial comparison is attempted.
//! 2. The object set difference is computed and the tables present in both
//!    catalogs become column-comparison candidates.
//! 3. Each candidate table is compared by its own task. Tasks are bounded by
//!    [`CompareOptions::max_concurrency`] and send their diffs through a
//!    bounded channel drained by a single collector.
//!
//! Once a table task fails, no further tables are scheduled; tasks already
//! in flight run to completion and the first error is returned. Dropping the
//! future returned by [`SchemaComparer::compare`] aborts every outstanding
//! task.

use std::sync::Arc;

use futures::future::try_join;
use regex::Regex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::compare::{column_diff, eligible_tables, object_diff};
use crate::error::{CompareError, Result};
use crate::model::{CatalogObject, ColumnDescriptor, ColumnIndex, TableDiff};
use crate::options::{ColumnFetch, CompareOptions, DiffMode};
use crate::reader::{CatalogReader, ColumnScope, ObjectFilter};

/// Outcome of a complete comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Objects in remote but not in local, in remote order.
    pub missing_from_local: Vec<CatalogObject>,
    /// Objects in local but not in remote, in local order.
    pub extraneous_in_local: Vec<CatalogObject>,
    /// Column discrepancies, sorted by table name.
    pub table_diffs: Vec<TableDiff>,
}

impl Comparison {
    /// Returns true if no difference was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing_from_local.is_empty()
            && self.extraneous_in_local.is_empty()
            && self.table_diffs.is_empty()
    }
}

/// Where per-table tasks read columns from.
enum ColumnSource<R> {
    /// Query both catalogs for each table.
    OnDemand { local: Arc<R>, remote: Arc<R> },
    /// Look tables up in indexes built before the table phase.
    Indexed {
        local: Arc<ColumnIndex>,
        remote: Arc<ColumnIndex>,
    },
}

impl<R> Clone for ColumnSource<R> {
    fn clone(&self) -> Self {
        match self {
            Self::OnDemand { local, remote } => Self::OnDemand {
                local: Arc::clone(local),
                remote: Arc::clone(remote),
            },
            Self::Indexed { local, remote } => Self::Indexed {
                local: Arc::clone(local),
                remote: Arc::clone(remote),
            },
        }
    }
}

impl<R: CatalogReader> ColumnSource<R> {
    async fn table_diff(&self, table: &str, mode: DiffMode) -> Result<Option<TableDiff>> {
        let diff = match self {
            Self::OnDemand { local, remote } => {
                let (local, remote) =
                    fetch_table_columns(local.as_ref(), remote.as_ref(), table).await?;
                column_diff(table, &local, &remote, mode)
            }
            Self::Indexed { local, remote } => {
                column_diff(table, local.columns(table), remote.columns(table), mode)
            }
        };

        Ok((!diff.is_empty()).then(|| TableDiff {
            table: table.to_string(),
            diff_text: diff,
        }))
    }
}

/// Fetches one table's columns from both catalogs, tagging errors with the table.
async fn fetch_table_columns<R: CatalogReader + ?Sized>(
    local: &R,
    remote: &R,
    table: &str,
) -> Result<(Vec<ColumnDescriptor>, Vec<ColumnDescriptor>)> {
    try_join(
        local.fetch_columns(ColumnScope::Table(table)),
        remote.fetch_columns(ColumnScope::Table(table)),
    )
    .await
    .map_err(|e| e.for_table(table))
}

async fn build_index<R: CatalogReader + ?Sized>(
    reader: &R,
    pattern: &Regex,
) -> Result<ColumnIndex> {
    let columns = reader.fetch_columns(ColumnScope::Matching(pattern)).await?;
    debug!(catalog = reader.label(), columns = columns.len(), "Fetched column listing");
    Ok(columns.into_iter().collect())
}

/// Compares the catalogs behind two readers.
pub struct SchemaComparer<R> {
    local: Arc<R>,
    remote: Arc<R>,
    options: CompareOptions,
}

impl<R: CatalogReader + 'static> SchemaComparer<R> {
    /// Creates a comparer for the given local and remote catalogs.
    #[must_use]
    pub const fn new(local: Arc<R>, remote: Arc<R>, options: CompareOptions) -> Self {
        Self {
            local,
            remote,
            options,
        }
    }

    /// Fetches the local and remote object lists concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; the other fetch is cancelled.
    pub async fn fetch_objects(
        &self,
        filter: &ObjectFilter,
    ) -> Result<(Vec<CatalogObject>, Vec<CatalogObject>)> {
        let (local, remote) = try_join(
            self.local.fetch_objects(filter),
            self.remote.fetch_objects(filter),
        )
        .await?;
        info!(
            local = local.len(),
            remote = remote.len(),
            "Fetched object lists"
        );
        Ok((local, remote))
    }

    /// Fetches the columns of one table from both catalogs concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error, tagged with `table`.
    pub async fn fetch_table_columns(
        &self,
        table: &str,
    ) -> Result<(Vec<ColumnDescriptor>, Vec<ColumnDescriptor>)> {
        fetch_table_columns(self.local.as_ref(), self.remote.as_ref(), table).await
    }

    /// Fetches every column of the tables matching `pattern` from both
    /// catalogs and indexes them by table.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; the other fetch is cancelled.
    pub async fn fetch_column_indexes(
        &self,
        pattern: &Regex,
    ) -> Result<(ColumnIndex, ColumnIndex)> {
        try_join(
            build_index(self.local.as_ref(), pattern),
            build_index(self.remote.as_ref(), pattern),
        )
        .await
    }

    /// Runs a complete comparison.
    ///
    /// # Errors
    ///
    /// Fails when the name pattern is invalid or when any catalog read
    /// fails. Nothing computed before the failure is returned.
    pub async fn compare(&self) -> Result<Comparison> {
        let filter = self.options.object_filter()?;

        let (local, remote, source) = match self.options.column_fetch {
            ColumnFetch::OnDemand => {
                let (local, remote) = self.fetch_objects(&filter).await?;
                let source = ColumnSource::OnDemand {
                    local: Arc::clone(&self.local),
                    remote: Arc::clone(&self.remote),
                };
                (local, remote, source)
            }
            ColumnFetch::Bulk => {
                let ((local, remote), (local_index, remote_index)) = try_join(
                    self.fetch_objects(&filter),
                    self.fetch_column_indexes(filter.pattern()),
                )
                .await?;
                let source = ColumnSource::Indexed {
                    local: Arc::new(local_index),
                    remote: Arc::new(remote_index),
                };
                (local, remote, source)
            }
        };

        let objects = object_diff(&local, &remote);
        let tables = eligible_tables(&local, &remote);
        let table_diffs = self.compare_tables(tables, source).await?;

        Ok(Comparison {
            missing_from_local: objects.missing_from_local,
            extraneous_in_local: objects.extraneous_in_local,
            table_diffs,
        })
    }

    async fn compare_tables(
        &self,
        tables: Vec<String>,
        source: ColumnSource<R>,
    ) -> Result<Vec<TableDiff>> {
        info!(tables = tables.len(), "Comparing table columns");

        let mode = self.options.diff_mode;
        let limit = self.options.max_concurrency.max(1);
        // Every table sends at most one diff, so producers never wait on a full buffer.
        let (tx, mut rx) = mpsc::channel::<TableDiff>(tables.len().max(1));

        let schedule = async move {
            let mut pending = tables.into_iter();
            let mut tasks = JoinSet::new();
            let mut first_error: Option<CompareError> = None;

            for table in pending.by_ref().take(limit) {
                spawn_table(&mut tasks, source.clone(), tx.clone(), table, mode);
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(err) = joined.map_err(CompareError::from).and_then(|r| r) {
                    if first_error.is_none() {
                        if err.is_cancelled() {
                            debug!(error = %err, "Table comparison cancelled, scheduling stopped");
                        } else {
                            warn!(error = %err, "Table comparison failed, scheduling stopped");
                        }
                        first_error = Some(err);
                    } else {
                        debug!(error = %err, "Additional table comparison failure");
                    }
                    continue;
                }
                if first_error.is_none() {
                    if let Some(table) = pending.next() {
                        spawn_table(&mut tasks, source.clone(), tx.clone(), table, mode);
                    }
                }
            }

            // Last sender: the channel closes once every task has finished.
            drop(tx);
            first_error.map_or(Ok(()), Err)
        };

        let collect = async move {
            let mut diffs = Vec::new();
            while let Some(diff) = rx.recv().await {
                diffs.push(diff);
            }
            diffs
        };

        let (scheduled, mut diffs) = tokio::join!(schedule, collect);
        scheduled?;

        diffs.sort_by(|a, b| a.table.cmp(&b.table));
        info!(differing = diffs.len(), "Column comparison finished");
        Ok(diffs)
    }
}

fn spawn_table<R: CatalogReader + 'static>(
    tasks: &mut JoinSet<Result<()>>,
    source: ColumnSource<R>,
    tx: mpsc::Sender<TableDiff>,
    table: String,
    mode: DiffMode,
) {
    tasks.spawn(async move {
        debug!(table = %table, "Comparing columns");
        if let Some(diff) = source.table_diff(&table, mode).await? {
            tx.send(diff)
                .await
                .map_err(|_| CompareError::Cancelled("diff collector closed".to_string()))?;
        }
        Ok(())
    });
}
