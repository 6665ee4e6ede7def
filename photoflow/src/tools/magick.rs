//! ImageMagick-backed image tools.

use async_trait::async_trait;
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::{
    ExportRequest, ExternalCommand, ImageMetadata, ImageTransformer, MetadataReader, ToolSettings,
    WatermarkCompositor,
};
use crate::errors::ToolError;

/// `identify` format: width, height, then the IPTC caption after a bar.
const IDENTIFY_FORMAT: &str = "%w %h|%[IPTC:2:120]\n";

// The pattern is a constant; it is covered by the parser tests below.
#[allow(clippy::expect_used)]
fn identify_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(r"^(\d+) (\d+)\|(.*)$").expect("identify pattern is valid"))
}

/// Parses the first line printed by `identify -format` [`IDENTIFY_FORMAT`].
pub fn parse_identify_output(program: &str, stdout: &str) -> Result<ImageMetadata, ToolError> {
    let line = stdout.lines().next().unwrap_or_default().trim_end();
    let caps = identify_line()
        .captures(line)
        .ok_or_else(|| ToolError::output(program, format!("cannot parse '{line}'")))?;

    let dimension = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|e| ToolError::output(program, format!("bad dimension '{}': {e}", &caps[i])))
    };
    let width = dimension(1)?;
    let height = dimension(2)?;

    let caption = caps[3].trim();
    Ok(ImageMetadata {
        max_dimension: width.max(height),
        caption: (!caption.is_empty()).then(|| caption.to_string()),
    })
}

/// Image tools implemented with the ImageMagick command line programs.
#[derive(Debug, Clone)]
pub struct ImageMagick {
    settings: Arc<ToolSettings>,
}

impl ImageMagick {
    /// Creates the tools from shared settings.
    #[must_use]
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self { settings }
    }

    /// Builds the `convert` command for an export.
    #[must_use]
    pub fn export_command(&self, request: &ExportRequest) -> ExternalCommand {
        let mut args: Vec<OsString> = vec![request.source.clone().into(), "-auto-orient".into()];
        if let Some(edge) = request.resize {
            args.push("-resize".into());
            args.push(format!("{edge}x{edge}").into());
        }
        if request.border {
            args.push("-bordercolor".into());
            args.push(self.settings.border_color.clone().into());
            args.push("-border".into());
            args.push(self.settings.border_width.to_string().into());
        }
        args.push("-quality".into());
        args.push(self.settings.quality.to_string().into());
        args.push(request.output.clone().into());

        ExternalCommand::new(&self.settings.convert).args(args)
    }

    /// Builds the `composite` command for a watermark.
    #[must_use]
    pub fn composite_command(&self, overlay: &Path, target: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.settings.composite)
            .arg("-gravity")
            .arg(&self.settings.watermark_gravity)
            .arg(overlay)
            .arg(target)
            .arg(target)
    }
}

#[async_trait]
impl MetadataReader for ImageMagick {
    async fn read(&self, path: &Path) -> Result<ImageMetadata, ToolError> {
        // [0] restricts multi-frame files to their first frame.
        let mut first_frame = path.as_os_str().to_os_string();
        first_frame.push("[0]");

        let stdout = ExternalCommand::new(&self.settings.identify)
            .arg("-format")
            .arg(IDENTIFY_FORMAT)
            .arg(first_frame)
            .output()
            .await?;
        parse_identify_output(&self.settings.identify, &stdout)
    }
}

#[async_trait]
impl ImageTransformer for ImageMagick {
    async fn export(&self, request: &ExportRequest) -> Result<(), ToolError> {
        self.export_command(request).run().await
    }
}

#[async_trait]
impl WatermarkCompositor for ImageMagick {
    async fn composite(&self, overlay: &Path, target: &Path) -> Result<(), ToolError> {
        if !overlay.is_file() {
            return Err(ToolError::MissingAsset {
                path: overlay.to_path_buf(),
            });
        }
        self.composite_command(overlay, target).run().await
    }
}
