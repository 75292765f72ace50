//! Comparison options.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::reader::ObjectFilter;

/// Object types compared when none are configured.
pub const DEFAULT_OBJECT_TYPES: &[&str] = &["TABLE", "PACKAGE", "SEQUENCE", "SYNONYM"];

/// Default object name pattern (project naming convention).
pub const DEFAULT_NAME_PATTERN: &str = "^[RT]_";

/// Default number of per-table comparisons in flight.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// How column differences are rendered.
///
/// The two modes are not equivalent for a column whose type changed:
/// statement mode emits one `MODIFY`, text mode one removal plus one addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// `ALTER TABLE` statements that turn local into remote.
    #[default]
    Statement,
    /// `+`/`-` lines over full column renderings.
    Text,
}

/// How column metadata is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnFetch {
    /// One query per catalog per candidate table.
    #[default]
    OnDemand,
    /// One query per catalog for every table matching the name pattern.
    Bulk,
}

/// Options controlling a comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOptions {
    /// Object types to compare.
    pub object_types: BTreeSet<String>,
    /// Regular expression object names must match. Empty matches everything.
    pub name_pattern: String,
    /// Column diff rendering.
    pub diff_mode: DiffMode,
    /// Column fetch strategy.
    pub column_fetch: ColumnFetch,
    /// Maximum number of tables compared concurrently.
    pub max_concurrency: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            object_types: DEFAULT_OBJECT_TYPES.iter().map(|t| (*t).to_string()).collect(),
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            diff_mode: DiffMode::default(),
            column_fetch: ColumnFetch::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl CompareOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the object type set.
    #[must_use]
    pub fn object_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.object_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the object name pattern.
    #[must_use]
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = pattern.into();
        self
    }

    /// Sets the diff mode.
    #[must_use]
    pub const fn diff_mode(mut self, mode: DiffMode) -> Self {
        self.diff_mode = mode;
        self
    }

    /// Sets the column fetch strategy.
    #[must_use]
    pub const fn column_fetch(mut self, strategy: ColumnFetch) -> Self {
        self.column_fetch = strategy;
        self
    }

    /// Sets the per-table concurrency limit (at least one).
    #[must_use]
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    /// Compiles the name pattern. An empty pattern matches every name.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::InvalidPattern`](crate::CompareError::InvalidPattern)
    /// when the pattern is not a valid regular expression.
    pub fn pattern(&self) -> Result<Regex> {
        let pattern = if self.name_pattern.is_empty() {
            "."
        } else {
            self.name_pattern.as_str()
        };
        Ok(Regex::new(pattern)?)
    }

    /// Builds the object filter handed to catalog readers.
    ///
    /// An empty type set falls back to [`DEFAULT_OBJECT_TYPES`].
    ///
    /// # Errors
    ///
    /// Fails when the name pattern does not compile.
    pub fn object_filter(&self) -> Result<ObjectFilter> {
        let types = if self.object_types.is_empty() {
            DEFAULT_OBJECT_TYPES.iter().map(|t| (*t).to_string()).collect()
        } else {
            self.object_types.clone()
        };
        Ok(ObjectFilter::new(types, self.pattern()?))
    }
}
