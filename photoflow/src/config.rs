//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is built once from parsed arguments and handed to
//! every stage by reference. Nothing mutates it during a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edge length of the small catalog thumbnail.
pub const SMALL_THUMBNAIL: u32 = 128;
/// Edge length of the large catalog thumbnail.
pub const LARGE_THUMBNAIL: u32 = 360;
/// Default longest edge for uploaded photos.
pub const DEFAULT_UPLOAD_SIZE: u32 = 2048;

/// How large exported photos should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeTarget {
    /// Keep the original dimensions.
    Original,
    /// Shrink so the longest edge is at most this many pixels.
    LongestEdge(u32),
}

impl Default for ResizeTarget {
    fn default() -> Self {
        Self::LongestEdge(DEFAULT_UPLOAD_SIZE)
    }
}

impl ResizeTarget {
    /// Builds a target from a pixel count, where `0` means the original size.
    #[must_use]
    pub fn from_pixels(pixels: u32) -> Self {
        if pixels == 0 {
            Self::Original
        } else {
            Self::LongestEdge(pixels)
        }
    }

    /// Returns the resize to apply to an image whose longest edge is
    /// `max_dimension`. Images are never upscaled.
    #[must_use]
    pub fn effective(&self, max_dimension: u32) -> Option<u32> {
        match *self {
            Self::LongestEdge(limit) if max_dimension > limit => Some(limit),
            Self::LongestEdge(_) | Self::Original => None,
        }
    }
}

/// Which watermark overlay to composite onto exported photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkVariant {
    /// No watermark.
    #[default]
    None,
    /// Light overlay, for dark photos.
    Light,
    /// Dark overlay, for light photos.
    Dark,
}

impl fmt::Display for WatermarkVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for WatermarkVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!(
                "unknown watermark variant '{other}' (expected none, light or dark)"
            )),
        }
    }
}

/// What to do when an output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Treat the existing output as done.
    #[default]
    SkipExisting,
    /// Regenerate it.
    Overwrite,
}

/// What happens to the derived output after a successful item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRetention {
    /// Delete the output once it has been used.
    #[default]
    Remove,
    /// Leave the output in place.
    Keep,
}

/// Whether terminal cleanup applies to items whose stages were all skipped.
///
/// A skipped item did no work this run, so by default its files are left
/// exactly as found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkippedCleanup {
    /// Leave skipped items untouched.
    #[default]
    Retain,
    /// Clean up skipped items like successful ones.
    Apply,
}

/// How item failures affect the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReporting {
    /// Any failed item makes the run exit non-zero.
    #[default]
    ExitNonZero,
    /// Failures are listed in the summary only.
    Suppress,
}

/// Immutable options controlling which stages run and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Resize target for exported photos.
    #[serde(default)]
    pub resize: ResizeTarget,
    /// Whether to add a border to exported photos.
    #[serde(default)]
    pub border: bool,
    /// Watermark overlay variant.
    #[serde(default)]
    pub watermark: WatermarkVariant,
    /// Whether the upload stage runs.
    #[serde(default = "default_upload")]
    pub upload: bool,
    /// Destination collection (album) name.
    #[serde(default)]
    pub collection: String,
    /// Owner of the destination collection.
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Handling of existing outputs.
    #[serde(default)]
    pub overwrite: OverwritePolicy,
    /// Handling of outputs after success.
    #[serde(default)]
    pub output_retention: OutputRetention,
    /// Delete the source file after a successful item.
    #[serde(default)]
    pub delete_source_on_success: bool,
    /// Delete output written during this run by an item that then failed.
    #[serde(default = "default_remove_partial")]
    pub remove_partial_on_failure: bool,
    /// Cleanup policy for skipped items.
    #[serde(default)]
    pub skipped_cleanup: SkippedCleanup,
    /// Thumbnail edge lengths to generate per catalog row.
    #[serde(default = "default_thumbnail_sizes")]
    pub thumbnail_sizes: Vec<u32>,
    /// Effect of failures on the exit code.
    #[serde(default)]
    pub failure_reporting: FailureReporting,
}

fn default_upload() -> bool {
    true
}

fn default_owner() -> String {
    "default".to_string()
}

fn default_remove_partial() -> bool {
    true
}

fn default_thumbnail_sizes() -> Vec<u32> {
    vec![SMALL_THUMBNAIL, LARGE_THUMBNAIL]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resize: ResizeTarget::default(),
            border: false,
            watermark: WatermarkVariant::default(),
            upload: default_upload(),
            collection: String::new(),
            owner: default_owner(),
            overwrite: OverwritePolicy::default(),
            output_retention: OutputRetention::default(),
            delete_source_on_success: false,
            remove_partial_on_failure: default_remove_partial(),
            skipped_cleanup: SkippedCleanup::default(),
            thumbnail_sizes: default_thumbnail_sizes(),
            failure_reporting: FailureReporting::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for uploading into `collection`.
    #[must_use]
    pub fn for_upload(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Defaults for thumbnail regeneration: thumbnails are kept, nothing is
    /// uploaded.
    #[must_use]
    pub fn for_thumbnails() -> Self {
        Self {
            upload: false,
            output_retention: OutputRetention::Keep,
            ..Self::default()
        }
    }

    /// Sets the resize target.
    #[must_use]
    pub fn with_resize(mut self, resize: ResizeTarget) -> Self {
        self.resize = resize;
        self
    }

    /// Enables or disables the border.
    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Sets the watermark variant.
    #[must_use]
    pub fn with_watermark(mut self, watermark: WatermarkVariant) -> Self {
        self.watermark = watermark;
        self
    }

    /// Enables or disables uploading.
    #[must_use]
    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    /// Sets the collection owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Sets the overwrite policy.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the output retention.
    #[must_use]
    pub fn with_output_retention(mut self, retention: OutputRetention) -> Self {
        self.output_retention = retention;
        self
    }

    /// Enables deleting sources of successful items.
    #[must_use]
    pub fn with_delete_source(mut self, delete: bool) -> Self {
        self.delete_source_on_success = delete;
        self
    }

    /// Controls removal of partial output from failed items.
    #[must_use]
    pub fn with_remove_partial(mut self, remove: bool) -> Self {
        self.remove_partial_on_failure = remove;
        self
    }

    /// Sets the cleanup policy for skipped items.
    #[must_use]
    pub fn with_skipped_cleanup(mut self, policy: SkippedCleanup) -> Self {
        self.skipped_cleanup = policy;
        self
    }

    /// Sets the thumbnail sizes.
    #[must_use]
    pub fn with_thumbnail_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.thumbnail_sizes = sizes;
        self
    }

    /// Sets the failure reporting policy.
    #[must_use]
    pub fn with_failure_reporting(mut self, reporting: FailureReporting) -> Self {
        self.failure_reporting = reporting;
        self
    }

    /// Returns true if existing outputs should be regenerated.
    #[must_use]
    pub fn overwrite_existing(&self) -> bool {
        self.overwrite == OverwritePolicy::Overwrite
    }

    /// Returns true if an output found on disk counts as finished work.
    ///
    /// Under [`OutputRetention::Remove`] a completed item leaves no output
    /// behind, so one that survives is the leftover of an interrupted or
    /// failed run and is regenerated.
    #[must_use]
    pub fn reuses_existing_outputs(&self) -> bool {
        !self.overwrite_existing() && self.output_retention == OutputRetention::Keep
    }
}
