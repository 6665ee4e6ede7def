//! The two standard stage chains.

use std::sync::Arc;

use super::executor::StageChain;
use crate::stages::{ExportStage, ThumbnailStage, UploadStage, WatermarkStage};
use crate::tools::{
    ImageTransformer, MetadataReader, ToolSettings, UploadClient, WatermarkCompositor,
};

/// Collaborators for the upload chain.
#[derive(Clone)]
pub struct UploadTools {
    /// Reads dimensions and captions.
    pub metadata: Arc<dyn MetadataReader>,
    /// Exports the resized copy.
    pub transformer: Arc<dyn ImageTransformer>,
    /// Applies the watermark.
    pub compositor: Arc<dyn WatermarkCompositor>,
    /// Uploads the result.
    pub client: Arc<dyn UploadClient>,
}

impl std::fmt::Debug for UploadTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTools").finish_non_exhaustive()
    }
}

/// export -> watermark -> upload.
#[must_use]
pub fn upload_chain(tools: UploadTools, settings: &ToolSettings) -> StageChain {
    StageChain::new()
        .with_stage(ExportStage::new(
            Arc::clone(&tools.metadata),
            Arc::clone(&tools.transformer),
        ))
        .with_stage(WatermarkStage::from_settings(tools.compositor, settings))
        .with_stage(UploadStage::new(tools.metadata, tools.client))
}

/// thumbnail.
#[must_use]
pub fn thumbnail_chain(transformer: Arc<dyn ImageTransformer>) -> StageChain {
    StageChain::new().with_stage(ThumbnailStage::new(transformer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{EXPORT, THUMBNAIL, UPLOAD, WATERMARK};
    use crate::testing::FakeImageTools;

    #[test]
    fn test_chain_order() {
        let fake = Arc::new(FakeImageTools::new());
        let tools = UploadTools {
            metadata: fake.clone(),
            transformer: fake.clone(),
            compositor: fake.clone(),
            client: fake.clone(),
        };

        assert_eq!(
            upload_chain(tools, &ToolSettings::default()).names(),
            vec![EXPORT, WATERMARK, UPLOAD]
        );
        assert_eq!(thumbnail_chain(fake).names(), vec![THUMBNAIL]);
    }
}
