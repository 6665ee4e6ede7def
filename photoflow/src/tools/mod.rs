//! External collaborators the stages call.
//!
//! Each capability sits behind a narrow async trait returning a typed
//! [`ToolError`], so stages never deal with process plumbing. The default
//! implementations shell out to ImageMagick and to a configurable upload
//! program.

mod command;
mod magick;
mod settings;
mod uploader;

pub use command::ExternalCommand;
pub use magick::{parse_identify_output, ImageMagick};
pub use settings::{ToolSettings, UploaderSettings};
pub use uploader::CommandUploader;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ToolError;

/// What the metadata reader reports about an image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// The longest edge in pixels.
    pub max_dimension: u32,
    /// The embedded caption, if any.
    pub caption: Option<String>,
}

/// A request to convert a source image into an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// The image to read.
    pub source: PathBuf,
    /// Longest edge to shrink to, or `None` to keep the size.
    pub resize: Option<u32>,
    /// Whether to add a border.
    pub border: bool,
    /// Where to write the result.
    pub output: PathBuf,
}

/// A request to upload one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Destination collection name.
    pub collection: String,
    /// The file to upload.
    pub file: PathBuf,
    /// Collection owner.
    pub owner: String,
    /// Caption to attach.
    pub caption: Option<String>,
}

/// Reads dimensions and caption from an image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Reads metadata for `path`.
    async fn read(&self, path: &Path) -> Result<ImageMetadata, ToolError>;
}

/// Converts, resizes and borders images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    /// Produces `request.output` from `request.source`.
    async fn export(&self, request: &ExportRequest) -> Result<(), ToolError>;
}

/// Composites an overlay onto an image in place.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatermarkCompositor: Send + Sync {
    /// Composites `overlay` onto `target`.
    async fn composite(&self, overlay: &Path, target: &Path) -> Result<(), ToolError>;
}

/// Uploads files to the photo service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Uploads one file.
    async fn upload(&self, request: &UploadRequest) -> Result<(), ToolError>;
}
