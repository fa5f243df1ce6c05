//! Run summaries returned by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timetable changes against the previous run, keyed by CRN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: Vec<u32>,
    pub removed: Vec<u32>,
    pub changed: Vec<u32>,
}

impl ChangeSummary {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.changed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Summary of one scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub departments: usize,
    pub offerings: usize,
    pub courses: usize,
    pub timetable_rows: usize,
    /// Records deliberately left out (thin departments, unparsable rows)
    pub excluded: usize,
    /// Units that failed but were skipped under the `continue` policy
    pub failures: Vec<String>,
    pub timetable_changes: Option<ChangeSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            departments: 0,
            offerings: 0,
            courses: 0,
            timetable_rows: 0,
            excluded: 0,
            failures: Vec::new(),
            timetable_changes: None,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn elapsed_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
