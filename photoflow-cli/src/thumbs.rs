//! Arguments of `thumb-regen`.

use clap::Parser;
use photoflow::config::{
    FailureReporting, OverwritePolicy, PipelineConfig, LARGE_THUMBNAIL, SMALL_THUMBNAIL,
};
use photoflow::errors::PhotoflowError;
use std::path::{Path, PathBuf};

/// Thumbnail directory below `$HOME` used by the photo manager.
pub const DEFAULT_THUMBS_DIR: &str = ".cache/shotwell/thumbs";

/// Regenerate the thumbnails of every photo in a photo manager catalog.
///
/// Thumbnails are written to `<THUMBS>/thumbs<size>/thumb<id>.jpg`, newest
/// photos first. Existing thumbnails are left alone unless `--overwrite`
/// is given.
#[derive(Debug, Parser)]
#[command(name = "thumb-regen", version)]
pub struct ThumbCli {
    /// Catalog database file
    pub catalog_db: PathBuf,

    /// Thumbnail root directory [default: $HOME/.cache/shotwell/thumbs]
    #[arg(long, value_name = "DIR")]
    pub thumbs: Option<PathBuf>,

    /// Generate the small (128px) thumbnails
    #[arg(long)]
    pub small: bool,

    /// Generate the large (360px) thumbnails
    #[arg(long)]
    pub large: bool,

    /// Regenerate existing thumbnails
    #[arg(long)]
    pub overwrite: bool,

    /// JSON file with external tool settings
    #[arg(long, value_name = "FILE")]
    pub tools: Option<PathBuf>,

    /// Exit 0 even if some thumbnails failed
    #[arg(long)]
    pub ignore_failures: bool,

    /// Write the run summary as JSON
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// No progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ThumbCli {
    /// Thumbnail sizes requested; both when neither flag is given.
    pub fn sizes(&self) -> Vec<u32> {
        match (self.small, self.large) {
            (true, false) => vec![SMALL_THUMBNAIL],
            (false, true) => vec![LARGE_THUMBNAIL],
            _ => vec![SMALL_THUMBNAIL, LARGE_THUMBNAIL],
        }
    }

    /// Resolves the thumbnail root, falling back to `home`.
    pub fn thumb_root(&self, home: Option<&Path>) -> Result<PathBuf, PhotoflowError> {
        match (&self.thumbs, home) {
            (Some(dir), _) => Ok(dir.clone()),
            (None, Some(home)) => Ok(home.join(DEFAULT_THUMBS_DIR)),
            (None, None) => Err(PhotoflowError::usage(
                "HOME is not set; pass --thumbs to choose the thumbnail directory",
            )),
        }
    }

    /// Builds the pipeline configuration.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::for_thumbnails()
            .with_thumbnail_sizes(self.sizes())
            .with_overwrite(if self.overwrite {
                OverwritePolicy::Overwrite
            } else {
                OverwritePolicy::SkipExisting
            })
            .with_failure_reporting(if self.ignore_failures {
                FailureReporting::Suppress
            } else {
                FailureReporting::ExitNonZero
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoflow::config::OutputRetention;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ThumbCli {
        let argv = std::iter::once("thumb-regen").chain(args.iter().copied());
        ThumbCli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_sizes() {
        assert_eq!(parse(&["db"]).sizes(), vec![128, 360]);
        assert_eq!(parse(&["db", "--small"]).sizes(), vec![128]);
        assert_eq!(parse(&["db", "--large"]).sizes(), vec![360]);
        assert_eq!(parse(&["db", "--small", "--large"]).sizes(), vec![128, 360]);
    }

    #[test]
    fn test_thumb_root() {
        let cli = parse(&["db"]);
        assert_eq!(
            cli.thumb_root(Some(Path::new("/home/alex"))).unwrap(),
            PathBuf::from("/home/alex/.cache/shotwell/thumbs")
        );
        assert!(matches!(cli.thumb_root(None), Err(PhotoflowError::Usage(_))));

        let explicit = parse(&["db", "--thumbs", "/t"]);
        assert_eq!(explicit.thumb_root(None).unwrap(), PathBuf::from("/t"));
    }

    #[test]
    fn test_config() {
        let config = parse(&["db", "--overwrite", "--large"]).config();
        assert!(config.overwrite_existing());
        assert!(!config.upload);
        assert_eq!(config.output_retention, OutputRetention::Keep);
        assert_eq!(config.thumbnail_sizes, vec![360]);
    }
}
