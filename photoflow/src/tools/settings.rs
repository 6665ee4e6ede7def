//! Settings for the external programs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::WatermarkVariant;
use crate::errors::{PhotoflowError, PreconditionError};

/// Locations and options of the programs the default tools invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ImageMagick metadata reader.
    #[serde(default = "default_identify")]
    pub identify: String,
    /// ImageMagick converter.
    #[serde(default = "default_convert")]
    pub convert: String,
    /// ImageMagick compositor.
    #[serde(default = "default_composite")]
    pub composite: String,
    /// Border width in pixels.
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    /// Border colour.
    #[serde(default = "default_border_color")]
    pub border_color: String,
    /// JPEG quality of exported files.
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Overlay used for the light watermark.
    #[serde(default = "default_watermark_light")]
    pub watermark_light: PathBuf,
    /// Overlay used for the dark watermark.
    #[serde(default = "default_watermark_dark")]
    pub watermark_dark: PathBuf,
    /// Where the watermark is anchored.
    #[serde(default = "default_gravity")]
    pub watermark_gravity: String,
    /// Upload program settings.
    #[serde(default)]
    pub uploader: UploaderSettings,
}

fn default_identify() -> String {
    "identify".to_string()
}

fn default_convert() -> String {
    "convert".to_string()
}

fn default_composite() -> String {
    "composite".to_string()
}

fn default_border_width() -> u32 {
    10
}

fn default_border_color() -> String {
    "white".to_string()
}

fn default_quality() -> u8 {
    90
}

fn default_watermark_light() -> PathBuf {
    PathBuf::from("watermark-light.png")
}

fn default_watermark_dark() -> PathBuf {
    PathBuf::from("watermark-dark.png")
}

fn default_gravity() -> String {
    "southeast".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            identify: default_identify(),
            convert: default_convert(),
            composite: default_composite(),
            border_width: default_border_width(),
            border_color: default_border_color(),
            quality: default_quality(),
            watermark_light: default_watermark_light(),
            watermark_dark: default_watermark_dark(),
            watermark_gravity: default_gravity(),
            uploader: UploaderSettings::default(),
        }
    }
}

impl ToolSettings {
    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PhotoflowError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PreconditionError::missing(path)
            } else {
                PreconditionError::unreadable(path, e)
            }
        })?;
        serde_json::from_str(&text).map_err(|source| PhotoflowError::InvalidSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings from `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, PhotoflowError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_json_file)
    }

    /// Returns the overlay asset for a watermark variant.
    #[must_use]
    pub fn overlay_for(&self, variant: WatermarkVariant) -> Option<&Path> {
        match variant {
            WatermarkVariant::None => None,
            WatermarkVariant::Light => Some(&self.watermark_light),
            WatermarkVariant::Dark => Some(&self.watermark_dark),
        }
    }
}

/// How the upload program is invoked.
///
/// The command line is `program args... <collection_flag> <collection>
/// <owner_flag> <owner> [<caption_flag> <caption>] <file>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderSettings {
    /// The upload program.
    #[serde(default = "default_upload_program")]
    pub program: String,
    /// Leading arguments (sub-commands).
    #[serde(default = "default_upload_args")]
    pub args: Vec<String>,
    /// Flag naming the destination collection.
    #[serde(default = "default_collection_flag")]
    pub collection_flag: String,
    /// Flag naming the owner.
    #[serde(default = "default_owner_flag")]
    pub owner_flag: String,
    /// Flag carrying the caption.
    #[serde(default = "default_caption_flag")]
    pub caption_flag: String,
}

fn default_upload_program() -> String {
    "google".to_string()
}

fn default_upload_args() -> Vec<String> {
    vec!["picasa".to_string(), "post".to_string()]
}

fn default_collection_flag() -> String {
    "--title".to_string()
}

fn default_owner_flag() -> String {
    "--owner".to_string()
}

fn default_caption_flag() -> String {
    "--summary".to_string()
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            program: default_upload_program(),
            args: default_upload_args(),
            collection_flag: default_collection_flag(),
            owner_flag: default_owner_flag(),
            caption_flag: default_caption_flag(),
        }
    }
}
