//! Error types for the photoflow pipeline.
//!
//! Errors fall into two groups. Run-level errors ([`PhotoflowError`]) abort
//! before the item loop starts and select the process exit code. Item-level
//! errors ([`StageError`], wrapping a [`ToolError`]) are recorded against a
//! single work item and never stop the run.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit status of a clean run.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for usage errors and runs with failed items.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status when a required path or resource is unavailable.
pub const EXIT_PRECONDITION: u8 = 2;
/// Exit status after a user interruption (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;

/// The main error type for photoflow runs.
#[derive(Debug, Error)]
pub enum PhotoflowError {
    /// Bad or missing command line input.
    #[error("usage error: {0}")]
    Usage(String),

    /// A required path or resource is absent.
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    /// The tool settings file could not be parsed.
    #[error("invalid settings in {}: {source}", path.display())]
    InvalidSettings {
        /// The settings file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl PhotoflowError {
    /// Creates a usage error.
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Returns the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Precondition(_) => EXIT_PRECONDITION,
            Self::Usage(_) | Self::InvalidSettings { .. } => EXIT_FAILURE,
        }
    }
}

/// Error raised when a required path or resource is unavailable.
#[derive(Debug, Clone, Error)]
#[error("{}: {reason}", path.display())]
pub struct PreconditionError {
    /// The offending path.
    pub path: PathBuf,
    /// Why the path cannot be used.
    pub reason: String,
}

impl PreconditionError {
    /// Creates a new precondition error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The path does not exist.
    #[must_use]
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::new(path, "no such file or directory")
    }

    /// The path exists but is not a directory.
    #[must_use]
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, "not a directory")
    }

    /// The path exists but could not be read.
    #[must_use]
    pub fn unreadable(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::new(path, format!("unreadable: {cause}"))
    }
}

/// A single stage failed for a single item.
#[derive(Debug, Error)]
#[error("stage '{stage}' failed: {source}")]
pub struct StageError {
    /// The failing stage.
    pub stage: String,
    /// The underlying tool failure.
    #[source]
    pub source: ToolError,
}

impl StageError {
    /// Creates a new stage error.
    #[must_use]
    pub fn new(stage: impl Into<String>, source: ToolError) -> Self {
        Self {
            stage: stage.into(),
            source,
        }
    }
}

/// Failures reported by external collaborators.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// The program name.
        program: String,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        /// The program name.
        program: String,
        /// The exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The program output could not be interpreted.
    #[error("unexpected output from '{program}': {message}")]
    Output {
        /// The program name.
        program: String,
        /// What was wrong with the output.
        message: String,
    },

    /// A required asset (e.g. a watermark overlay) is missing.
    #[error("missing asset: {}", path.display())]
    MissingAsset {
        /// The expected asset location.
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The IO error.
        #[source]
        source: std::io::Error,
    },

    /// The item lacks data a stage needs.
    #[error("invalid item: {0}")]
    InvalidItem(String),
}

impl ToolError {
    /// Creates a non-zero exit error.
    #[must_use]
    pub fn failed(
        program: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Failed {
            program: program.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Creates an output parsing error.
    #[must_use]
    pub fn output(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Output {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Creates a filesystem error.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors raised while reading the photo catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The database could not be opened.
    #[error("cannot open catalog: {0}")]
    Open(#[source] rusqlite::Error),

    /// The photo query failed.
    #[error("catalog query failed: {0}")]
    Query(#[source] rusqlite::Error),
}
