//! In-memory collaborators for end-to-end tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::WorkItem;
use crate::enumerate::{CatalogReader, CatalogRow, WorkSource};
use crate::errors::{CatalogError, PhotoflowError, PreconditionError, ToolError};
use crate::tools::{
    ExportRequest, ImageMetadata, ImageTransformer, MetadataReader, UploadClient, UploadRequest,
    WatermarkCompositor,
};

/// The operations [`FakeImageTools`] can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOperation {
    /// Metadata read.
    Metadata,
    /// Export or thumbnail render.
    Export,
    /// Watermark composite.
    Watermark,
    /// Upload.
    Upload,
}

/// A call received by [`FakeImageTools`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    /// `MetadataReader::read`.
    Metadata(PathBuf),
    /// `ImageTransformer::export`.
    Export(ExportRequest),
    /// `WatermarkCompositor::composite`.
    Watermark {
        /// The overlay asset.
        overlay: PathBuf,
        /// The composited file.
        target: PathBuf,
    },
    /// `UploadClient::upload`.
    Upload(UploadRequest),
}

impl FakeCall {
    fn operation(&self) -> FakeOperation {
        match self {
            Self::Metadata(_) => FakeOperation::Metadata,
            Self::Export(_) => FakeOperation::Export,
            Self::Watermark { .. } => FakeOperation::Watermark,
            Self::Upload(_) => FakeOperation::Upload,
        }
    }
}

#[derive(Debug)]
struct FakeState {
    metadata: ImageMetadata,
    failures: Vec<(FakeOperation, PathBuf)>,
    calls: Vec<FakeCall>,
}

/// Image tools that record calls and write placeholder output files.
///
/// Implements every tool trait, so one instance can back a whole chain.
/// Clones share their state.
#[derive(Debug, Clone)]
pub struct FakeImageTools {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeImageTools {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeImageTools {
    /// Creates tools reporting 4000 pixel images without captions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                metadata: ImageMetadata {
                    max_dimension: 4000,
                    caption: None,
                },
                failures: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Sets the reported caption.
    #[must_use]
    pub fn with_caption(self, caption: impl Into<String>) -> Self {
        self.state.lock().metadata.caption = Some(caption.into());
        self
    }

    /// Makes `operation` fail whenever it touches `path`.
    ///
    /// Exports match on their source or output, uploads on the uploaded file.
    #[must_use]
    pub fn fail_on(self, operation: FakeOperation, path: impl Into<PathBuf>) -> Self {
        self.state.lock().failures.push((operation, path.into()));
        self
    }

    /// Returns every call received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().calls.clone()
    }

    /// Returns how many calls of `operation` were received.
    #[must_use]
    pub fn count(&self, operation: FakeOperation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Returns the export requests received.
    #[must_use]
    pub fn exports(&self) -> Vec<ExportRequest> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Export(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the upload requests received.
    #[must_use]
    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Upload(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Records `call` and returns whether it is scripted to fail.
    fn record(&self, call: FakeCall, paths: &[&Path]) -> Result<(), ToolError> {
        let operation = call.operation();
        let mut state = self.state.lock();
        state.calls.push(call);
        let scripted = state
            .failures
            .iter()
            .any(|(op, p)| *op == operation && paths.contains(&p.as_path()));
        if scripted {
            Err(ToolError::failed(
                format!("fake-{operation:?}").to_lowercase(),
                "exit status: 1",
                "scripted failure",
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MetadataReader for FakeImageTools {
    async fn read(&self, path: &Path) -> Result<ImageMetadata, ToolError> {
        self.record(FakeCall::Metadata(path.to_path_buf()), &[path])?;
        Ok(self.state.lock().metadata.clone())
    }
}

#[async_trait]
impl ImageTransformer for FakeImageTools {
    async fn export(&self, request: &ExportRequest) -> Result<(), ToolError> {
        self.record(
            FakeCall::Export(request.clone()),
            &[request.source.as_path(), request.output.as_path()],
        )?;
        tokio::fs::write(&request.output, b"fake image")
            .await
            .map_err(|e| ToolError::io(&request.output, e))
    }
}

#[async_trait]
impl WatermarkCompositor for FakeImageTools {
    async fn composite(&self, overlay: &Path, target: &Path) -> Result<(), ToolError> {
        self.record(
            FakeCall::Watermark {
                overlay: overlay.to_path_buf(),
                target: target.to_path_buf(),
            },
            &[target],
        )
    }
}

#[async_trait]
impl UploadClient for FakeImageTools {
    async fn upload(&self, request: &UploadRequest) -> Result<(), ToolError> {
        self.record(FakeCall::Upload(request.clone()), &[request.file.as_path()])
    }
}

/// A catalog backed by a fixed list of rows.
///
/// `location` must exist on disk for a scan to accept it.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    location: PathBuf,
    rows: Vec<CatalogRow>,
}

impl StaticCatalog {
    /// Creates a catalog at `location` returning `rows` as given.
    pub fn new(location: impl Into<PathBuf>, rows: Vec<CatalogRow>) -> Self {
        Self {
            location: location.into(),
            rows,
        }
    }
}

impl CatalogReader for StaticCatalog {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read_rows(&self) -> Result<Vec<CatalogRow>, CatalogError> {
        Ok(self.rows.clone())
    }
}

/// A work source whose enumeration always fails with a precondition error.
#[derive(Debug, Clone)]
pub struct FailingSource {
    error: PreconditionError,
}

impl FailingSource {
    /// Creates the source.
    #[must_use]
    pub fn new(error: PreconditionError) -> Self {
        Self { error }
    }
}

impl WorkSource for FailingSource {
    fn describe(&self) -> String {
        format!("unavailable {}", self.error.path.display())
    }

    fn enumerate(&self) -> Result<Vec<WorkItem>, PhotoflowError> {
        Err(self.error.clone().into())
    }
}
