//! Upload of the exported photo.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::{processed_previously, Stage};
use crate::config::PipelineConfig;
use crate::core::WorkItem;
use crate::errors::StageError;
use crate::tools::{MetadataReader, UploadClient, UploadRequest};

/// Name of the upload stage.
pub const UPLOAD: &str = "upload";

/// Uploads the item's output into the configured collection.
#[derive(Clone)]
pub struct UploadStage {
    metadata: Arc<dyn MetadataReader>,
    client: Arc<dyn UploadClient>,
}

impl UploadStage {
    /// Creates the stage. `metadata` supplies the caption.
    pub fn new(metadata: Arc<dyn MetadataReader>, client: Arc<dyn UploadClient>) -> Self {
        Self { metadata, client }
    }
}

impl std::fmt::Debug for UploadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for UploadStage {
    fn name(&self) -> &str {
        UPLOAD
    }

    fn applies(&self, config: &PipelineConfig) -> bool {
        config.upload
    }

    fn skip_if(&self, item: &WorkItem, config: &PipelineConfig) -> bool {
        processed_previously(item, config)
    }

    async fn execute(&self, item: &WorkItem, config: &PipelineConfig) -> Result<(), StageError> {
        // A missing caption never blocks the upload.
        let caption = match self.metadata.read(item.source()).await {
            Ok(meta) => meta.caption,
            Err(e) => {
                warn!(item = %item.label(), error = %e, "Uploading without caption");
                None
            }
        };

        let request = UploadRequest {
            collection: config.collection.clone(),
            file: item.output().to_path_buf(),
            owner: config.owner.clone(),
            caption,
        };
        self.client
            .upload(&request)
            .await
            .map_err(|e| StageError::new(UPLOAD, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputRetention;
    use crate::errors::ToolError;
    use crate::tools::{ImageMetadata, MockMetadataReader, MockUploadClient};

    #[tokio::test]
    async fn test_upload_request_fields() {
        let mut reader = MockMetadataReader::new();
        reader.expect_read().returning(|_| {
            Ok(ImageMetadata {
                max_dimension: 100,
                caption: Some("Harbour".to_string()),
            })
        });
        let mut client = MockUploadClient::new();
        client
            .expect_upload()
            .withf(|req| {
                req.collection == "Trip"
                    && req.owner == "bob"
                    && req.caption.as_deref() == Some("Harbour")
                    && req.file.ends_with("a_web.jpg")
            })
            .times(1)
            .returning(|_| Ok(()));

        let stage = UploadStage::new(Arc::new(reader), Arc::new(client));
        let config = PipelineConfig::for_upload("Trip").with_owner("bob");
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        stage.execute(&item, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_caption_failure_still_uploads() {
        let mut reader = MockMetadataReader::new();
        reader
            .expect_read()
            .returning(|_| Err(ToolError::output("identify", "no caption")));
        let mut client = MockUploadClient::new();
        client
            .expect_upload()
            .withf(|req| req.caption.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let stage = UploadStage::new(Arc::new(reader), Arc::new(client));
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        stage
            .execute(&item, &PipelineConfig::for_upload("Trip"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_failure_is_stage_error() {
        let mut reader = MockMetadataReader::new();
        reader.expect_read().returning(|_| Ok(ImageMetadata::default()));
        let mut client = MockUploadClient::new();
        client
            .expect_upload()
            .returning(|_| Err(ToolError::failed("google", "exit status: 1", "quota exceeded")));

        let stage = UploadStage::new(Arc::new(reader), Arc::new(client));
        let item = WorkItem::from_file("/p/a.jpg", "/p/a_web.jpg");

        let err = stage
            .execute(&item, &PipelineConfig::for_upload("Trip"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, UPLOAD);
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_disabled_upload() {
        let stage = UploadStage::new(
            Arc::new(MockMetadataReader::new()),
            Arc::new(MockUploadClient::new()),
        );
        assert!(!stage.applies(&PipelineConfig::for_upload("Trip").with_upload(false)));
    }

    #[test]
    fn test_leftover_output_is_uploaded_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("a_web.jpg");
        std::fs::write(&output, b"leftover").unwrap();
        let mut item = WorkItem::from_file(dir.path().join("a.jpg"), &output);
        item.begin();

        let stage = UploadStage::new(
            Arc::new(MockMetadataReader::new()),
            Arc::new(MockUploadClient::new()),
        );
        let config = PipelineConfig::for_upload("Trip");

        assert!(!stage.skip_if(&item, &config));
        assert!(stage.skip_if(&item, &config.with_output_retention(OutputRetention::Keep)));
    }
}
