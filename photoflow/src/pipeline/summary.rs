//! Run summary and failure records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FailureReporting;
use crate::core::{ItemOutcome, WorkItem};
use crate::errors::{EXIT_FAILURE, EXIT_SUCCESS};

/// Record of one failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// The item identifier.
    pub item: String,
    /// The error message.
    pub error: String,
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier.
    pub run_id: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished, if it did.
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of enumerated items.
    pub total: usize,
    /// Items that completed successfully.
    pub processed: usize,
    /// Items whose stages were all already satisfied.
    pub skipped: usize,
    /// Failed item identifiers, in processing order.
    pub failed: Vec<String>,
    /// Failure details, parallel to `failed`.
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    /// Creates an empty summary for `total` items.
    #[must_use]
    pub fn new(run_id: impl Into<String>, total: usize) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            total,
            processed: 0,
            skipped: 0,
            failed: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Records the terminal outcome of an item. Pending items are ignored.
    pub fn record(&mut self, item: &WorkItem) {
        match item.outcome() {
            ItemOutcome::Success => self.processed += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed => {
                let label = item.label();
                self.failures.push(FailureRecord {
                    item: label.clone(),
                    error: item.failure().unwrap_or("unknown error").to_string(),
                });
                self.failed.push(label);
            }
            ItemOutcome::Pending => {}
        }
    }

    /// Marks the run finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of items with a terminal outcome.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.processed + self.skipped + self.failed.len()
    }

    /// Returns true if any item failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Selects the exit code for a finished run.
    #[must_use]
    pub fn exit_code(&self, reporting: FailureReporting) -> u8 {
        if self.has_failures() && reporting == FailureReporting::ExitNonZero {
            EXIT_FAILURE
        } else {
            EXIT_SUCCESS
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Done: {} processed, {} skipped, {} failed (of {})",
            self.processed,
            self.skipped,
            self.failed.len(),
            self.total
        )
    }

    /// Serializes the summary as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
