//! Watermark overlay on the exported photo.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{processed_previously, Stage};
use crate::config::{PipelineConfig, WatermarkVariant};
use crate::core::WorkItem;
use crate::errors::{StageError, ToolError};
use crate::tools::{ToolSettings, WatermarkCompositor};

/// Name of the watermark stage.
pub const WATERMARK: &str = "watermark";

/// Composites the configured overlay onto the item's output.
#[derive(Clone)]
pub struct WatermarkStage {
    compositor: Arc<dyn WatermarkCompositor>,
    overlays: HashMap<WatermarkVariant, PathBuf>,
}

impl WatermarkStage {
    /// Creates the stage with explicit overlay assets.
    pub fn new(
        compositor: Arc<dyn WatermarkCompositor>,
        overlays: HashMap<WatermarkVariant, PathBuf>,
    ) -> Self {
        Self {
            compositor,
            overlays,
        }
    }

    /// Creates the stage with the overlays named in `settings`.
    pub fn from_settings(
        compositor: Arc<dyn WatermarkCompositor>,
        settings: &ToolSettings,
    ) -> Self {
        let overlays = [WatermarkVariant::Light, WatermarkVariant::Dark]
            .into_iter()
            .filter_map(|v| settings.overlay_for(v).map(|p| (v, p.to_path_buf())))
            .collect();
        Self::new(compositor, overlays)
    }
}

impl std::fmt::Debug for WatermarkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkStage")
            .field("overlays", &self.overlays)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for WatermarkStage {
    fn name(&self) -> &str {
        WATERMARK
    }

    fn applies(&self, config: &PipelineConfig) -> bool {
        config.watermark != WatermarkVariant::None
    }

    fn skip_if(&self, item: &WorkItem, config: &PipelineConfig) -> bool {
        processed_previously(item, config)
    }

    async fn execute(&self, item: &WorkItem, config: &PipelineConfig) -> Result<(), StageError> {
        let overlay = self.overlays.get(&config.watermark).ok_or_else(|| {
            StageError::new(
                WATERMARK,
                ToolError::InvalidItem(format!("no overlay configured for '{}'", config.watermark)),
            )
        })?;
        self.compositor
            .composite(overlay, item.output())
            .await
            .map_err(|e| StageError::new(WATERMARK, e))
    }
}
