//! Catalog thumbnail generation.

use async_trait::async_trait;
use std::sync::Arc;

use super::{output_satisfied, Stage};
use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::errors::{StageError, ToolError};
use crate::tools::{ExportRequest, ImageTransformer};

/// Name of the thumbnail stage.
pub const THUMBNAIL: &str = "thumbnail";

/// Renders one thumbnail size for a catalog item.
#[derive(Clone)]
pub struct ThumbnailStage {
    transformer: Arc<dyn ImageTransformer>,
}

impl ThumbnailStage {
    /// Creates the stage.
    pub fn new(transformer: Arc<dyn ImageTransformer>) -> Self {
        Self { transformer }
    }
}

impl std::fmt::Debug for ThumbnailStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ThumbnailStage {
    fn name(&self) -> &str {
        THUMBNAIL
    }

    fn applies(&self, _config: &PipelineConfig) -> bool {
        true
    }

    fn skip_if(&self, item: &WorkItem, config: &PipelineConfig) -> bool {
        output_satisfied(item, config)
    }

    async fn execute(&self, item: &WorkItem, _config: &PipelineConfig) -> Result<(), StageError> {
        let fail = |e| StageError::new(THUMBNAIL, e);

        let size = item.thumbnail_size().ok_or_else(|| {
            fail(ToolError::InvalidItem(format!(
                "{} has no thumbnail size",
                item.label()
            )))
        })?;

        if let Some(dir) = item.output().parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| fail(ToolError::io(dir, e)))?;
        }

        let request = ExportRequest {
            source: item.source().to_path_buf(),
            resize: Some(size),
            border: false,
            output: item.output().to_path_buf(),
        };
        self.transformer.export(&request).await.map_err(fail)
    }
}
