//! Arguments of `photo-upload`.

use clap::Parser;
use photoflow::config::{
    FailureReporting, OutputRetention, OverwritePolicy, PipelineConfig, ResizeTarget,
    SkippedCleanup, WatermarkVariant, DEFAULT_UPLOAD_SIZE,
};
use photoflow::enumerate::{DirectoryScan, DEFAULT_MARKER};
use photoflow::errors::PhotoflowError;
use std::path::PathBuf;

/// Resize, watermark and upload every unprocessed photo in a directory.
///
/// Each photo is exported next to its source as `<name><marker>.jpg`,
/// uploaded into COLLECTION, and the export is removed unless `--keep` is
/// given. Files already carrying the marker are never picked up.
#[derive(Debug, Parser)]
#[command(name = "photo-upload", version)]
pub struct UploadCli {
    /// Directory containing the photos
    pub source_dir: PathBuf,

    /// Destination collection (album) name
    pub collection: String,

    /// Longest edge of uploaded photos in pixels, 0 for the original size
    #[arg(short, long, default_value_t = DEFAULT_UPLOAD_SIZE)]
    pub size: u32,

    /// Add a border around each photo
    #[arg(short, long)]
    pub border: bool,

    /// Watermark overlay: none, light or dark
    #[arg(short, long, default_value = "none")]
    pub watermark: WatermarkVariant,

    /// Owner of the destination collection
    #[arg(long, env = "PHOTOFLOW_OWNER", default_value = "default")]
    pub owner: String,

    /// Export only, do not upload
    #[arg(long)]
    pub no_upload: bool,

    /// Regenerate and re-upload photos that were already exported
    #[arg(long)]
    pub overwrite: bool,

    /// Keep the exported files
    #[arg(short, long)]
    pub keep: bool,

    /// Delete each source photo once it has been uploaded
    #[arg(long)]
    pub delete_source: bool,

    /// Keep exports of photos that failed part way
    #[arg(long)]
    pub keep_partial: bool,

    /// Apply cleanup to photos that were skipped as already done
    #[arg(long)]
    pub cleanup_skipped: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// File name suffix marking exported photos
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// JSON file with external tool settings
    #[arg(long, value_name = "FILE")]
    pub tools: Option<PathBuf>,

    /// Exit 0 even if some photos failed
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

impl UploadCli {
    /// Builds the pipeline configuration, rejecting unusable values.
    pub fn config(&self) -> Result<PipelineConfig, PhotoflowError> {
        if self.collection.trim().is_empty() {
            return Err(PhotoflowError::usage("collection name must not be empty"));
        }
        if self.marker.is_empty() {
            return Err(PhotoflowError::usage("marker must not be empty"));
        }
        if self.no_upload && self.delete_source {
            return Err(PhotoflowError::usage(
                "--delete-source needs an upload; it cannot be combined with --no-upload",
            ));
        }

        // Without an upload the export is the only result, so it is kept.
        let retention = if self.keep || self.no_upload {
            OutputRetention::Keep
        } else {
            OutputRetention::Remove
        };

        Ok(PipelineConfig::for_upload(self.collection.clone())
            .with_resize(ResizeTarget::from_pixels(self.size))
            .with_border(self.border)
            .with_watermark(self.watermark)
            .with_upload(!self.no_upload)
            .with_owner(self.owner.clone())
            .with_overwrite(if self.overwrite {
                OverwritePolicy::Overwrite
            } else {
                OverwritePolicy::SkipExisting
            })
            .with_output_retention(retention)
            .with_delete_source(self.delete_source)
            .with_remove_partial(!self.keep_partial)
            .with_skipped_cleanup(if self.cleanup_skipped {
                SkippedCleanup::Apply
            } else {
                SkippedCleanup::Retain
            })
            .with_failure_reporting(if self.ignore_failures {
                FailureReporting::Suppress
            } else {
                FailureReporting::ExitNonZero
            }))
    }

    /// Builds the directory scan.
    pub fn scan(&self) -> DirectoryScan {
        DirectoryScan::new(&self.source_dir)
            .with_marker(self.marker.clone())
            .recursive(self.recursive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> UploadCli {
        let argv = std::iter::once("photo-upload").chain(args.iter().copied());
        UploadCli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["/photos", "Holidays"]);
        let config = cli.config().unwrap();

        assert_eq!(config.collection, "Holidays");
        assert_eq!(config.resize, ResizeTarget::LongestEdge(DEFAULT_UPLOAD_SIZE));
        assert_eq!(config.watermark, WatermarkVariant::None);
        assert!(config.upload);
        assert_eq!(config.output_retention, OutputRetention::Remove);
        assert_eq!(config.skipped_cleanup, SkippedCleanup::Retain);
        assert!(config.remove_partial_on_failure);
        assert_eq!(cli.scan().root(), std::path::Path::new("/photos"));
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "/photos",
            "Holidays",
            "--size",
            "0",
            "--watermark",
            "dark",
            "--keep",
            "--overwrite",
            "--no-upload",
            "--ignore-failures",
            "--cleanup-skipped",
            "--owner",
            "alex",
            "-vv",
        ]);
        let config = cli.config().unwrap();

        assert_eq!(config.resize, ResizeTarget::Original);
        assert_eq!(config.watermark, WatermarkVariant::Dark);
        assert_eq!(config.output_retention, OutputRetention::Keep);
        assert!(config.overwrite_existing());
        assert!(!config.upload);
        assert_eq!(config.failure_reporting, FailureReporting::Suppress);
        assert_eq!(config.skipped_cleanup, SkippedCleanup::Apply);
        assert_eq!(config.owner, "alex");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_empty_collection_is_usage_error() {
        let err = parse(&["/photos", " "]).config().unwrap_err();
        assert!(matches!(err, PhotoflowError::Usage(_)));
    }

    #[test]
    fn test_no_upload_keeps_exports() {
        let config = parse(&["/photos", "Holidays", "--no-upload"]).config().unwrap();
        assert!(!config.upload);
        assert_eq!(config.output_retention, OutputRetention::Keep);
        assert!(!config.delete_source_on_success);
    }

    #[test]
    fn test_no_upload_with_delete_source_is_usage_error() {
        let cli = parse(&["/photos", "Holidays", "--no-upload", "--delete-source"]);
        assert!(matches!(cli.config(), Err(PhotoflowError::Usage(_))));
    }

    #[test]
    fn test_bad_watermark_rejected() {
        let argv = ["photo-upload", "/p", "x", "--watermark", "sepia"];
        assert!(UploadCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_missing_collection_rejected() {
        assert!(UploadCli::try_parse_from(["photo-upload", "/p"]).is_err());
    }
}
