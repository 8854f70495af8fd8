//! Per-run source records and merge summary.

use serde::Serialize;
use std::path::PathBuf;

/// How fetching a source went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchOutcome {
    Fetched { bytes: usize },
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Statistics for a single rule source in one run
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    pub name: String,
    pub url: String,
    pub outcome: FetchOutcome,
    /// Lines that parsed into a supported rule
    pub parsed: usize,
    /// Rules this source added that no earlier source had
    pub contributed: usize,
}

/// Result of one merge run, printed by `merge --json`
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub total: usize,
    pub previous: Option<usize>,
    pub delta: Option<i64>,
    pub sources: Vec<SourceRecord>,
    pub output: PathBuf,
    pub written: bool,
}

impl MergeSummary {
    pub fn new(
        total: usize,
        previous: Option<usize>,
        sources: Vec<SourceRecord>,
        output: PathBuf,
        written: bool,
    ) -> Self {
        Self {
            total,
            previous,
            delta: previous.map(|p| total as i64 - p as i64),
            sources,
            output,
            written,
        }
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_failed()).count()
    }
}
