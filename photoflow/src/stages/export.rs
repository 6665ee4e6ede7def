//! Resize/border export of a source photo.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{output_satisfied, Stage};
use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::errors::StageError;
use crate::tools::{ExportRequest, ImageTransformer, MetadataReader};

/// Name of the export stage.
pub const EXPORT: &str = "export";

/// Writes the resized, optionally bordered copy of the source.
#[derive(Clone)]
pub struct ExportStage {
    metadata: Arc<dyn MetadataReader>,
    transformer: Arc<dyn ImageTransformer>,
}

impl ExportStage {
    /// Creates the stage.
    pub fn new(metadata: Arc<dyn MetadataReader>, transformer: Arc<dyn ImageTransformer>) -> Self {
        Self {
            metadata,
            transformer,
        }
    }
}

impl std::fmt::Debug for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ExportStage {
    fn name(&self) -> &str {
        EXPORT
    }

    fn applies(&self, _config: &PipelineConfig) -> bool {
        true
    }

    fn skip_if(&self, item: &WorkItem, config: &PipelineConfig) -> bool {
        output_satisfied(item, config)
    }

    async fn execute(&self, item: &WorkItem, config: &PipelineConfig) -> Result<(), StageError> {
        let metadata = self
            .metadata
            .read(item.source())
            .await
            .map_err(|e| StageError::new(EXPORT, e))?;

        let resize = config.resize.effective(metadata.max_dimension);
        debug!(item = %item.label(), max_dimension = metadata.max_dimension, ?resize, "Exporting");

        let request = ExportRequest {
            source: item.source().to_path_buf(),
            resize,
            border: config.border,
            output: item.output().to_path_buf(),
        };
        self.transformer
            .export(&request)
            .await
            .map_err(|e| StageError::new(EXPORT, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputRetention, OverwritePolicy, ResizeTarget};
    use crate::errors::ToolError;
    use crate::tools::{ImageMetadata, MockImageTransformer, MockMetadataReader};

    fn reader(max_dimension: u32) -> MockMetadataReader {
        let mut reader = MockMetadataReader::new();
        reader.expect_read().returning(move |_| {
            Ok(ImageMetadata {
                max_dimension,
                caption: None,
            })
        });
        reader
    }

    #[tokio::test]
    async fn test_export_resizes_large_images() {
        let mut transformer = MockImageTransformer::new();
        transformer
            .expect_export()
            .withf(|req| {
                req.resize == Some(1024) && req.border && req.output.ends_with("a_web.jpg")
            })
            .times(1)
            .returning(|_| Ok(()));

        let stage = ExportStage::new(Arc::new(reader(3000)), Arc::new(transformer));
        let config = PipelineConfig::for_upload("x")
            .with_resize(ResizeTarget::LongestEdge(1024))
            .with_border(true);
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        stage.execute(&item, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_export_keeps_small_images() {
        let mut transformer = MockImageTransformer::new();
        transformer
            .expect_export()
            .withf(|req| req.resize.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let stage = ExportStage::new(Arc::new(reader(800)), Arc::new(transformer));
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        stage
            .execute(&item, &PipelineConfig::for_upload("x"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_metadata_failure_skips_transform() {
        let mut reader = MockMetadataReader::new();
        reader
            .expect_read()
            .returning(|_| Err(ToolError::output("identify", "corrupt")));
        let mut transformer = MockImageTransformer::new();
        transformer.expect_export().never();

        let stage = ExportStage::new(Arc::new(reader), Arc::new(transformer));
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        let err = stage
            .execute(&item, &PipelineConfig::for_upload("x"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, EXPORT);
    }

    #[test]
    fn test_skip_if_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("a_web.jpg");
        std::fs::write(&output, b"done").unwrap();
        let item = WorkItem::from_file(dir.path().join("a.jpg"), &output);

        let stage = ExportStage::new(
            Arc::new(MockMetadataReader::new()),
            Arc::new(MockImageTransformer::new()),
        );
        let config = PipelineConfig::for_upload("x").with_output_retention(OutputRetention::Keep);

        assert!(stage.skip_if(&item, &config));
        assert!(!stage.skip_if(&item, &config.clone().with_overwrite(OverwritePolicy::Overwrite)));
        // A leftover under the removal policy is regenerated.
        assert!(!stage.skip_if(&item, &config.with_output_retention(OutputRetention::Remove)));
    }
}
