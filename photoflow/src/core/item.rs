//! The unit of batch work.

use super::{ItemOutcome, StageStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies where a work item came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemId {
    /// A file found by a directory scan.
    File {
        /// The source file.
        path: PathBuf,
    },
    /// One thumbnail size of one catalog row.
    CatalogRow {
        /// The catalog row id.
        id: i64,
        /// The photo file recorded in the row.
        filename: PathBuf,
        /// The thumbnail edge length in pixels.
        size: u32,
    },
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "{}", path.display()),
            Self::CatalogRow { id, filename, size } => {
                write!(f, "{} (#{id}, {size}px)", filename.display())
            }
        }
    }
}

/// A photo file or catalog row moving through the stage chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    id: ItemId,
    source: PathBuf,
    output: PathBuf,
    outcome: ItemOutcome,
    #[serde(default)]
    stages: Vec<(String, StageStatus)>,
    #[serde(default)]
    output_preexisting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

impl WorkItem {
    /// Creates an item for a scanned file.
    #[must_use]
    pub fn from_file(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let source = source.into();
        Self::new(
            ItemId::File {
                path: source.clone(),
            },
            source,
            output.into(),
        )
    }

    /// Creates an item for one thumbnail size of a catalog row.
    #[must_use]
    pub fn from_catalog_row(
        id: i64,
        filename: impl Into<PathBuf>,
        size: u32,
        output: impl Into<PathBuf>,
    ) -> Self {
        let filename = filename.into();
        Self::new(
            ItemId::CatalogRow {
                id,
                filename: filename.clone(),
                size,
            },
            filename,
            output.into(),
        )
    }

    fn new(id: ItemId, source: PathBuf, output: PathBuf) -> Self {
        Self {
            id,
            source,
            output,
            outcome: ItemOutcome::Pending,
            stages: Vec::new(),
            output_preexisting: false,
            failure: None,
        }
    }

    /// Returns the item identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the identifier as reported in summaries.
    #[must_use]
    pub fn label(&self) -> String {
        self.id.to_string()
    }

    /// Returns the source file.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the derived output file.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Returns the requested thumbnail size for catalog items.
    #[must_use]
    pub fn thumbnail_size(&self) -> Option<u32> {
        match self.id {
            ItemId::CatalogRow { size, .. } => Some(size),
            ItemId::File { .. } => None,
        }
    }

    /// Returns the current outcome.
    #[must_use]
    pub fn outcome(&self) -> ItemOutcome {
        self.outcome
    }

    /// Returns the failure message, if the item failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Returns true if the output file existed before this run touched the item.
    #[must_use]
    pub fn output_preexisting(&self) -> bool {
        self.output_preexisting
    }

    /// Returns the recorded status of a stage.
    #[must_use]
    pub fn stage_status(&self, stage: &str) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|(name, _)| name == stage)
            .map(|(_, status)| *status)
    }

    /// Returns every stage status recorded so far, in chain order.
    #[must_use]
    pub fn stages(&self) -> &[(String, StageStatus)] {
        &self.stages
    }

    /// Returns true if any stage executed successfully.
    #[must_use]
    pub fn executed_any(&self) -> bool {
        self.stages.iter().any(|(_, status)| *status == StageStatus::Ok)
    }

    /// Snapshots filesystem state before the first stage runs.
    pub(crate) fn begin(&mut self) {
        self.output_preexisting = self.output.exists();
        self.stages.clear();
        self.failure = None;
        self.outcome = ItemOutcome::Pending;
    }

    pub(crate) fn record_stage(&mut self, stage: &str, status: StageStatus) {
        self.stages.push((stage.to_string(), status));
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
        self.outcome = ItemOutcome::Failed;
    }

    pub(crate) fn set_outcome(&mut self, outcome: ItemOutcome) {
        self.outcome = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_item_label_is_path() {
        let item = WorkItem::from_file("/photos/a.jpg", "/photos/a_web.jpg");
        assert_eq!(item.label(), "/photos/a.jpg");
        assert_eq!(item.thumbnail_size(), None);
        assert_eq!(item.outcome(), ItemOutcome::Pending);
    }

    #[test]
    fn test_catalog_item_label() {
        let item = WorkItem::from_catalog_row(42, "/photos/b.jpg", 360, "/thumbs/thumbs360/x.jpg");
        assert_eq!(item.label(), "/photos/b.jpg (#42, 360px)");
        assert_eq!(item.thumbnail_size(), Some(360));
        assert_eq!(item.source(), Path::new("/photos/b.jpg"));
    }

    #[test]
    fn test_stage_records() {
        let mut item = WorkItem::from_file("a.jpg", "a_web.jpg");
        item.begin();
        item.record_stage("export", StageStatus::Skipped);
        assert!(!item.executed_any());

        item.record_stage("upload", StageStatus::Ok);
        assert!(item.executed_any());
        assert_eq!(item.stage_status("export"), Some(StageStatus::Skipped));
        assert_eq!(item.stage_status("watermark"), None);
    }

    #[test]
    fn test_begin_resets_state() {
        let mut item = WorkItem::from_file("a.jpg", "does/not/exist_web.jpg");
        item.record_stage("export", StageStatus::Failed);
        item.fail("boom");

        item.begin();
        assert!(item.stages().is_empty());
        assert!(item.failure().is_none());
        assert!(!item.output_preexisting());
        assert_eq!(item.outcome(), ItemOutcome::Pending);
    }
}
