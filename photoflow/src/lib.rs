//! # Photoflow
//!
//! Sequential batch processing of photo collections.
//!
//! Photoflow runs every item of a batch through an ordered chain of stages,
//! one item at a time:
//!
//! - **Work sources**: a directory scan of unprocessed photos, or the rows of
//!   a photo catalog expanded per thumbnail size
//! - **Idempotent stages**: each stage checks whether its result already
//!   exists and skips itself if so
//! - **Failure isolation**: a failing stage ends its item only; the run
//!   continues and the failure shows up in the summary and exit code
//! - **External tools**: image conversion, watermarking and uploading sit
//!   behind narrow async traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use photoflow::prelude::*;
//!
//! let config = PipelineConfig::for_upload("Holidays");
//! let chain = upload_chain(tools, &ToolSettings::default());
//! let mut orchestrator = Orchestrator::new(config, chain);
//!
//! let outcome = orchestrator
//!     .run(&DirectoryScan::new("/photos"), &mut NoOpReporter, std::future::pending())
//!     .await?;
//! std::process::exit(i32::from(outcome.exit_code()));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod enumerate;
pub mod errors;
pub mod pipeline;
pub mod progress;
pub mod stages;
pub mod testing;
pub mod tools;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        FailureReporting, OutputRetention, OverwritePolicy, PipelineConfig, ResizeTarget,
        SkippedCleanup, WatermarkVariant,
    };
    pub use crate::core::{ItemId, ItemOutcome, StageStatus, WorkItem};
    pub use crate::enumerate::{CatalogScan, DirectoryScan, SqliteCatalog, WorkSource};
    pub use crate::errors::{PhotoflowError, PreconditionError, StageError, ToolError};
    pub use crate::pipeline::{
        thumbnail_chain, upload_chain, Orchestrator, RunOutcome, RunState, RunSummary,
        StageChain, UploadTools,
    };
    pub use crate::progress::{NoOpReporter, ProgressReporter, TerminalReporter};
    pub use crate::stages::Stage;
    pub use crate::tools::{CommandUploader, ImageMagick, ToolSettings};
}
