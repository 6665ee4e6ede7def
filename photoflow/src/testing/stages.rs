//! Scripted stages for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::errors::{StageError, ToolError};
use crate::stages::Stage;

/// How a [`RecordingStage`] responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageBehavior {
    /// Executes and succeeds.
    #[default]
    Succeed,
    /// Reports its result as already present.
    Skip,
    /// Is not active for the run.
    Inactive,
    /// Executes and fails.
    Fail,
    /// Executes and never completes.
    Hang,
}

#[derive(Debug, Default)]
struct Recorded {
    skip_checks: usize,
    executed: Vec<PathBuf>,
}

/// A stage that records every call. Clones share their records.
#[derive(Debug, Clone)]
pub struct RecordingStage {
    name: String,
    behavior: StageBehavior,
    fail_for: Vec<PathBuf>,
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingStage {
    /// Creates a stage that always succeeds.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: StageBehavior::default(),
            fail_for: Vec::new(),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Sets the behavior for every item.
    #[must_use]
    pub fn behave(mut self, behavior: StageBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Fails only for the item whose source is `source`.
    #[must_use]
    pub fn fail_for(mut self, source: impl Into<PathBuf>) -> Self {
        self.fail_for.push(source.into());
        self
    }

    /// Returns how many times `execute` ran.
    #[must_use]
    pub fn executions(&self) -> usize {
        self.recorded.lock().executed.len()
    }

    /// Returns how many times `skip_if` was consulted.
    #[must_use]
    pub fn skip_checks(&self) -> usize {
        self.recorded.lock().skip_checks
    }
}

#[async_trait]
impl Stage for RecordingStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies(&self, _config: &PipelineConfig) -> bool {
        self.behavior != StageBehavior::Inactive
    }

    fn skip_if(&self, _item: &WorkItem, _config: &PipelineConfig) -> bool {
        self.recorded.lock().skip_checks += 1;
        self.behavior == StageBehavior::Skip
    }

    async fn execute(&self, item: &WorkItem, _config: &PipelineConfig) -> Result<(), StageError> {
        self.recorded.lock().executed.push(item.source().to_path_buf());

        let scripted_failure = self.fail_for.iter().any(|p| p == item.source());
        match self.behavior {
            StageBehavior::Hang => std::future::pending().await,
            StageBehavior::Fail => Err(self.failure()),
            _ if scripted_failure => Err(self.failure()),
            _ => Ok(()),
        }
    }
}

impl RecordingStage {
    fn failure(&self) -> StageError {
        StageError::new(
            self.name.clone(),
            ToolError::failed(self.name.clone(), "exit status: 1", "scripted failure"),
        )
    }
}
