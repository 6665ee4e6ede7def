//! Item outcome and stage status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Item has not been processed yet.
    #[default]
    Pending,
    /// At least one stage executed and none failed.
    Success,
    /// Every active stage was already satisfied.
    Skipped,
    /// A stage failed.
    Failed,
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl ItemOutcome {
    /// Returns true if the outcome is final.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the outcome counts against the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// What happened to one stage for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage is disabled for this run.
    Inactive,
    /// Stage was bypassed by its idempotency check.
    Skipped,
    /// Stage executed successfully.
    Ok,
    /// Stage executed and failed.
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Skipped => write!(f, "skipped"),
            Self::Ok => write!(f, "ok"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_outcome_display() {
        assert_eq!(ItemOutcome::Pending.to_string(), "pending");
        assert_eq!(ItemOutcome::Success.to_string(), "success");
        assert_eq!(ItemOutcome::Skipped.to_string(), "skipped");
        assert_eq!(ItemOutcome::Failed.to_string(), "failed");
    }

    #[test]
    fn test_item_outcome_is_terminal() {
        assert!(!ItemOutcome::Pending.is_terminal());
        assert!(ItemOutcome::Success.is_terminal());
        assert!(ItemOutcome::Skipped.is_terminal());
        assert!(ItemOutcome::Failed.is_terminal());
        assert!(ItemOutcome::Failed.is_failure());
        assert!(!ItemOutcome::Skipped.is_failure());
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Skipped).unwrap();
        assert_eq!(json, r#""skipped""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::Skipped);
    }
}
