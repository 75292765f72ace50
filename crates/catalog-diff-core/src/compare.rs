//! Object and column set differences.
//!
//! All functions here are pure and total: any two finite listings,
//! including empty ones, compare without error.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use serde::Serialize;

use crate::model::{CatalogObject, ColumnDescriptor};
use crate::options::DiffMode;

/// Object-level differences between two catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectDiff {
    /// Objects in remote but not in local, in remote order.
    pub missing_from_local: Vec<CatalogObject>,
    /// Objects in local but not in remote, in local order.
    pub extraneous_in_local: Vec<CatalogObject>,
}

impl ObjectDiff {
    /// Returns true if both catalogs hold the same objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing_from_local.is_empty() && self.extraneous_in_local.is_empty()
    }
}

/// Returns the objects of `source` whose identity is absent from `other`,
/// preserving `source` order.
fn difference(source: &[CatalogObject], other: &[CatalogObject]) -> Vec<CatalogObject> {
    let other: HashSet<&CatalogObject> = other.iter().collect();
    source
        .iter()
        .filter(|o| !other.contains(o))
        .cloned()
        .collect()
}

/// Computes both object set differences.
#[must_use]
pub fn object_diff(local: &[CatalogObject], remote: &[CatalogObject]) -> ObjectDiff {
    ObjectDiff {
        missing_from_local: difference(remote, local),
        extraneous_in_local: difference(local, remote),
    }
}

/// Names of the tables present in both catalogs, in remote order.
///
/// Only objects whose type is exactly `TABLE` qualify.
#[must_use]
pub fn eligible_tables(local: &[CatalogObject], remote: &[CatalogObject]) -> Vec<String> {
    let local: HashSet<&CatalogObject> = local.iter().filter(|o| o.is_table()).collect();
    remote
        .iter()
        .filter(|o| o.is_table() && local.contains(o))
        .map(|o| o.name.clone())
        .collect()
}

/// Computes the column diff of one table in the requested mode.
///
/// Returns an empty string when the column lists agree.
#[must_use]
pub fn column_diff(
    table: &str,
    local: &[ColumnDescriptor],
    remote: &[ColumnDescriptor],
    mode: DiffMode,
) -> String {
    match mode {
        DiffMode::Statement => statement_diff(table, local, remote),
        DiffMode::Text => text_diff(local, remote),
    }
}

/// Renders the `ALTER TABLE` statements turning `local` into `remote`.
///
/// `ADD` and `MODIFY` follow remote order, `DROP` follows local order.
/// `MODIFY` carries the old local signature as a trailing comment.
#[must_use]
pub fn statement_diff(
    table: &str,
    local: &[ColumnDescriptor],
    remote: &[ColumnDescriptor],
) -> String {
    let local_by_name: HashMap<&str, &ColumnDescriptor> =
        local.iter().map(|c| (c.name.as_str(), c)).collect();
    let remote_names: HashSet<&str> = remote.iter().map(|c| c.name.as_str()).collect();

    let mut diff = String::new();
    for r in remote {
        match local_by_name.get(r.name.as_str()) {
            None => {
                let _ = writeln!(diff, "ALTER TABLE {table} ADD {} {};", r.name, r.type_signature);
            }
            Some(l) if l.type_signature != r.type_signature => {
                let _ = writeln!(
                    diff,
                    "ALTER TABLE {table} MODIFY {} {}; --{}",
                    r.name, r.type_signature, l.type_signature
                );
            }
            Some(_) => {}
        }
    }
    for l in local {
        if !remote_names.contains(l.name.as_str()) {
            let _ = writeln!(diff, "ALTER TABLE {table} DROP {};", l.name);
        }
    }
    diff
}

/// Renders `-`/`+` lines over full `<name> <signature>` renderings.
///
/// `-` lines are remote renderings missing locally (remote order), `+`
/// lines are local renderings missing remotely (local order).
#[must_use]
pub fn text_diff(local: &[ColumnDescriptor], remote: &[ColumnDescriptor]) -> String {
    let local: Vec<String> = local.iter().map(ColumnDescriptor::render).collect();
    let remote: Vec<String> = remote.iter().map(ColumnDescriptor::render).collect();
    let local_set: HashSet<&str> = local.iter().map(String::as_str).collect();
    let remote_set: HashSet<&str> = remote.iter().map(String::as_str).collect();

    let mut diff = String::new();
    for r in remote.iter().filter(|r| !local_set.contains(r.as_str())) {
        let _ = writeln!(diff, "-{r}");
    }
    for l in local.iter().filter(|l| !remote_set.contains(l.as_str())) {
        let _ = writeln!(diff, "+{l}");
    }
    diff
}
