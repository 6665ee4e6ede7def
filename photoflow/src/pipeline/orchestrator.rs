//! Run orchestration: enumerate, process each item in order, summarize.

use std::future::Future;
use tracing::{info, warn};
use uuid::Uuid;

use super::cleanup::finalize_item;
use super::executor::StageChain;
use super::summary::RunSummary;
use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::enumerate::WorkSource;
use crate::errors::{PhotoflowError, EXIT_INTERRUPTED};
use crate::progress::ProgressReporter;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started.
    Init,
    /// Listing work items.
    Enumerating,
    /// Working on item `index` (1-based) of `total`.
    Processing {
        /// Current item, 1-based.
        index: usize,
        /// Number of items.
        total: usize,
    },
    /// Aggregating the summary.
    Finalizing,
    /// Finished normally.
    Done,
    /// Stopped by a cancellation signal.
    Interrupted,
}

impl RunState {
    /// Returns true for `Done` and `Interrupted`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Interrupted)
    }
}

/// Result of a run that got past enumeration.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every item was processed.
    Completed {
        /// The final summary.
        summary: RunSummary,
        /// Exit code selected by the failure reporting policy.
        exit_code: u8,
    },
    /// The run was cancelled part way.
    Interrupted {
        /// Outcomes of the items finished before the signal.
        summary: RunSummary,
    },
}

impl RunOutcome {
    /// Returns the summary, complete or partial.
    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        match self {
            Self::Completed { summary, .. } | Self::Interrupted { summary } => summary,
        }
    }

    /// Returns the process exit code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed { exit_code, .. } => *exit_code,
            Self::Interrupted { .. } => EXIT_INTERRUPTED,
        }
    }

    /// Returns true if the run was interrupted.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Drives one batch run through its states.
#[derive(Debug)]
pub struct Orchestrator {
    run_id: String,
    config: PipelineConfig,
    chain: StageChain,
    state: RunState,
}

impl Orchestrator {
    /// Creates an orchestrator for one run.
    #[must_use]
    pub fn new(config: PipelineConfig, chain: StageChain) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            config,
            chain,
            state: RunState::Init,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs every item from `source` through the chain, one at a time.
    ///
    /// Enumeration errors are returned before any item is touched. Once the
    /// loop starts, item failures only show up in the summary. If `interrupt`
    /// resolves, the item in flight is abandoned and the run stops in
    /// [`RunState::Interrupted`].
    pub async fn run<S, R, F>(
        &mut self,
        source: &S,
        reporter: &mut R,
        interrupt: F,
    ) -> Result<RunOutcome, PhotoflowError>
    where
        S: WorkSource + ?Sized,
        R: ProgressReporter + ?Sized,
        F: Future<Output = ()>,
    {
        self.state = RunState::Enumerating;
        info!(run_id = %self.run_id, source = %source.describe(), "Enumerating work items");
        let mut items = match source.enumerate() {
            Ok(items) => items,
            Err(e) => {
                self.state = RunState::Done;
                return Err(e);
            }
        };

        let total = items.len();
        let mut summary = RunSummary::new(self.run_id.clone(), total);
        info!(run_id = %self.run_id, total, stages = ?self.chain.names(), "Processing items");

        tokio::pin!(interrupt);

        for (offset, item) in items.iter_mut().enumerate() {
            let index = offset + 1;
            self.state = RunState::Processing { index, total };
            reporter.status(index, total, &item.label());

            let interrupted = tokio::select! {
                biased;
                () = &mut interrupt => true,
                () = process(&self.chain, &self.config, &mut *item) => false,
            };

            if interrupted {
                warn!(run_id = %self.run_id, index, total, "Run interrupted");
                self.state = RunState::Interrupted;
                reporter.finish(&format!("Interrupted at item {index} of {total}"));
                return Ok(RunOutcome::Interrupted { summary });
            }

            summary.record(item);
        }

        self.state = RunState::Finalizing;
        summary.finish();
        let exit_code = summary.exit_code(self.config.failure_reporting);
        reporter.finish(&summary.message());
        info!(
            run_id = %self.run_id,
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed.len(),
            "Run finished"
        );

        self.state = RunState::Done;
        Ok(RunOutcome::Completed { summary, exit_code })
    }
}

async fn process(chain: &StageChain, config: &PipelineConfig, item: &mut WorkItem) {
    chain.run(item, config).await;
    finalize_item(item, config).await;
}
