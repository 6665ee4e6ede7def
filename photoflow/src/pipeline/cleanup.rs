//! Terminal cleanup of item files.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{OutputRetention, PipelineConfig, SkippedCleanup};
use crate::core::{ItemOutcome, WorkItem};

/// Applies the configured cleanup to a finished item and returns the paths
/// removed.
///
/// A failed item never loses its source. Its output is removed only when
/// this run may have written it. Without an upload the export is the only
/// result, so success cleanup leaves both files alone. Deletion errors are
/// logged and otherwise ignored.
pub async fn finalize_item(item: &WorkItem, config: &PipelineConfig) -> Vec<PathBuf> {
    let mut targets: Vec<&Path> = Vec::new();

    match item.outcome() {
        ItemOutcome::Success => success_targets(item, config, &mut targets),
        ItemOutcome::Skipped if config.skipped_cleanup == SkippedCleanup::Apply => {
            success_targets(item, config, &mut targets);
        }
        ItemOutcome::Failed => {
            let written_this_run =
                !item.output_preexisting() || !config.reuses_existing_outputs();
            if config.remove_partial_on_failure && written_this_run {
                targets.push(item.output());
            }
        }
        ItemOutcome::Skipped | ItemOutcome::Pending => {}
    }

    let mut removed = Vec::new();
    for path in targets {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(item = %item.label(), path = %path.display(), "Removed file");
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(item = %item.label(), path = %path.display(), error = %e, "Cleanup failed");
            }
        }
    }
    removed
}

fn success_targets<'a>(item: &'a WorkItem, config: &PipelineConfig, targets: &mut Vec<&'a Path>) {
    if !config.upload {
        return;
    }
    if config.output_retention == OutputRetention::Remove {
        targets.push(item.output());
    }
    if config.delete_source_on_success {
        targets.push(item.source());
    }
}
