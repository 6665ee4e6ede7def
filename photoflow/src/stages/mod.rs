//! Stage trait and implementations.
//!
//! Stages are the units of work applied to each item, in chain order. A
//! stage decides whether it is active for the run ([`Stage::applies`]),
//! whether its result already exists ([`Stage::skip_if`]), and performs
//! the external operation ([`Stage::execute`]).

mod export;
mod thumbnail;
mod upload;
mod watermark;

pub use export::{ExportStage, EXPORT};
pub use thumbnail::{ThumbnailStage, THUMBNAIL};
pub use upload::{UploadStage, UPLOAD};
pub use watermark::{WatermarkStage, WATERMARK};

use async_trait::async_trait;
use std::fmt::Debug;

use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::errors::StageError;

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Returns true if the stage is active for this run.
    fn applies(&self, config: &PipelineConfig) -> bool;

    /// Returns true if the stage's result already exists for `item`.
    fn skip_if(&self, item: &WorkItem, config: &PipelineConfig) -> bool;

    /// Performs the stage's operation on `item`.
    async fn execute(&self, item: &WorkItem, config: &PipelineConfig) -> Result<(), StageError>;
}

/// The output exists and counts as finished work.
fn output_satisfied(item: &WorkItem, config: &PipelineConfig) -> bool {
    config.reuses_existing_outputs() && item.output().exists()
}

/// The output was kept by an earlier run before this run reached the item,
/// so every stage that follows its creation already ran.
fn processed_previously(item: &WorkItem, config: &PipelineConfig) -> bool {
    config.reuses_existing_outputs() && item.output_preexisting()
}
