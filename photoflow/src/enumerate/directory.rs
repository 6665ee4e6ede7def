//! Directory scans for photo files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::WorkSource;
use crate::core::WorkItem;
use crate::errors::{PhotoflowError, PreconditionError};

/// Extensions picked up by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];
/// Suffix marking files this tool produced.
pub const DEFAULT_MARKER: &str = "_web";

/// Returns true if `path` carries the processed-file marker.
#[must_use]
pub fn is_processed(path: &Path, marker: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(marker))
}

/// Derives the output path: `dir/name.ext` becomes `dir/name<marker>.jpg`.
#[must_use]
pub fn output_path_for(source: &Path, marker: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{marker}.jpg"))
}

/// Output path that keeps the source extension: `dir/name.ext` becomes
/// `dir/name_ext<marker>.jpg`. Used when two sources share a stem.
#[must_use]
pub fn distinct_output_path_for(source: &Path, marker: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match source.extension() {
        Some(ext) => source.with_file_name(format!("{stem}_{}{marker}.jpg", ext.to_string_lossy())),
        None => output_path_for(source, marker),
    }
}

/// Pairs each source with its output. Sources whose plain output names
/// collide all switch to the extension-keeping name; a source whose output
/// is still taken is left out with a warning.
fn assign_outputs(sources: BTreeSet<PathBuf>, marker: &str) -> Vec<WorkItem> {
    let mut claims: BTreeMap<PathBuf, usize> = BTreeMap::new();
    for source in &sources {
        *claims.entry(output_path_for(source, marker)).or_default() += 1;
    }

    let mut taken = BTreeSet::new();
    let mut items = Vec::with_capacity(sources.len());
    for source in sources {
        let mut output = output_path_for(&source, marker);
        if claims.get(&output).copied().unwrap_or_default() > 1 {
            output = distinct_output_path_for(&source, marker);
        }
        if !taken.insert(output.clone()) {
            warn!(
                source = %source.display(),
                output = %output.display(),
                "Output name already used by another photo, skipping"
            );
            continue;
        }
        items.push(WorkItem::from_file(source, output));
    }
    items
}

/// Scans a directory for photos that have not been processed yet.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    root: PathBuf,
    extensions: Vec<String>,
    marker: String,
    recursive: bool,
}

impl DirectoryScan {
    /// Creates a non-recursive scan of `root` with default filters.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            marker: DEFAULT_MARKER.to_string(),
            recursive: false,
        }
    }

    /// Sets the processed-file marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the accepted extensions (compared case-insensitively).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Enables scanning subdirectories.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Returns the scan root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches(&self, path: &Path) -> bool {
        let extension_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
        extension_ok && !is_processed(path, &self.marker)
    }

    fn check_root(&self) -> Result<(), PreconditionError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(PreconditionError::not_a_directory(&self.root)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PreconditionError::missing(&self.root))
            }
            Err(e) => Err(PreconditionError::unreadable(&self.root, e)),
        }
    }
}

impl WorkSource for DirectoryScan {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn enumerate(&self) -> Result<Vec<WorkItem>, PhotoflowError> {
        self.check_root()?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut found = BTreeSet::new();

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(max_depth) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(PreconditionError::unreadable(&self.root, e).into());
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.matches(entry.path()) {
                found.insert(entry.into_path());
            }
        }

        debug!(root = %self.root.display(), count = found.len(), "Directory scanned");

        Ok(assign_outputs(found, &self.marker))
    }
}
