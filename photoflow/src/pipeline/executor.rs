//! Ordered, short-circuiting stage chain.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::core::{ItemOutcome, StageStatus, WorkItem};
use crate::stages::Stage;

/// Runs an ordered list of stages against one item at a time.
#[derive(Debug, Clone, Default)]
pub struct StageChain {
    stages: Vec<Arc<dyn Stage>>,
}

impl StageChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Returns the stage names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage against `item` and sets its terminal outcome.
    ///
    /// Inactive stages are bypassed silently, satisfied stages are recorded
    /// as skipped, and the first failing stage ends the chain.
    pub async fn run(&self, item: &mut WorkItem, config: &PipelineConfig) -> ItemOutcome {
        item.begin();

        for stage in &self.stages {
            let name = stage.name();

            if !stage.applies(config) {
                item.record_stage(name, StageStatus::Inactive);
                continue;
            }

            if stage.skip_if(item, config) {
                debug!(item = %item.label(), stage = name, "Stage already satisfied");
                item.record_stage(name, StageStatus::Skipped);
                continue;
            }

            debug!(item = %item.label(), stage = name, "Stage started");
            if let Err(err) = stage.execute(item, config).await {
                warn!(item = %item.label(), stage = name, error = %err, "Stage failed");
                item.record_stage(name, StageStatus::Failed);
                item.fail(err.to_string());
                return ItemOutcome::Failed;
            }
            item.record_stage(name, StageStatus::Ok);
        }

        let outcome = if item.executed_any() {
            ItemOutcome::Success
        } else {
            ItemOutcome::Skipped
        };
        item.set_outcome(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingStage, StageBehavior};
    use pretty_assertions::assert_eq;

    fn item() -> WorkItem {
        WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg")
    }

    #[tokio::test]
    async fn test_all_stages_succeed() {
        let first = RecordingStage::new("first");
        let second = RecordingStage::new("second");
        let chain = StageChain::new()
            .with_stage(first.clone())
            .with_stage(second.clone());

        let mut item = item();
        let outcome = chain.run(&mut item, &PipelineConfig::new()).await;

        assert_eq!(outcome, ItemOutcome::Success);
        assert_eq!(item.outcome(), ItemOutcome::Success);
        assert_eq!(first.executions(), 1);
        assert_eq!(second.executions(), 1);
    }

    #[tokio::test]
    async fn test_failure_short_circuits() {
        let failing = RecordingStage::new("first").behave(StageBehavior::Fail);
        let after = RecordingStage::new("second");
        let chain = StageChain::new()
            .with_stage(failing.clone())
            .with_stage(after.clone());

        let mut item = item();
        let outcome = chain.run(&mut item, &PipelineConfig::new()).await;

        assert_eq!(outcome, ItemOutcome::Failed);
        assert_eq!(after.executions(), 0);
        assert_eq!(item.stage_status("first"), Some(StageStatus::Failed));
        assert_eq!(item.stage_status("second"), None);
        assert!(item.failure().unwrap().contains("first"));
    }

    #[tokio::test]
    async fn test_skipped_stage_never_executes() {
        let skipped = RecordingStage::new("first").behave(StageBehavior::Skip);
        let after = RecordingStage::new("second");
        let chain = StageChain::new()
            .with_stage(skipped.clone())
            .with_stage(after.clone());

        let mut item = item();
        let outcome = chain.run(&mut item, &PipelineConfig::new()).await;

        assert_eq!(skipped.executions(), 0);
        assert_eq!(after.executions(), 1);
        assert_eq!(outcome, ItemOutcome::Success);
        assert_eq!(item.stage_status("first"), Some(StageStatus::Skipped));
    }

    #[tokio::test]
    async fn test_all_skipped_is_skipped() {
        let chain = StageChain::new()
            .with_stage(RecordingStage::new("first").behave(StageBehavior::Skip))
            .with_stage(RecordingStage::new("second").behave(StageBehavior::Inactive));

        let mut item = item();
        assert_eq!(
            chain.run(&mut item, &PipelineConfig::new()).await,
            ItemOutcome::Skipped
        );
        assert_eq!(item.stage_status("second"), Some(StageStatus::Inactive));
    }

    #[tokio::test]
    async fn test_inactive_stage_not_consulted() {
        let inactive = RecordingStage::new("off").behave(StageBehavior::Inactive);
        let chain = StageChain::new().with_stage(inactive.clone());

        let mut item = item();
        chain.run(&mut item, &PipelineConfig::new()).await;

        assert_eq!(inactive.skip_checks(), 0);
        assert_eq!(inactive.executions(), 0);
    }

    #[test]
    fn test_names() {
        let chain = StageChain::new()
            .with_stage(RecordingStage::new("export"))
            .with_stage(RecordingStage::new("upload"));
        assert_eq!(chain.names(), vec!["export", "upload"]);
        assert_eq!(chain.len(), 2);
    }
}
