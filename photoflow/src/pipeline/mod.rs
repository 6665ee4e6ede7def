//! Pipeline execution.
//!
//! This module provides:
//! - The short-circuiting per-item stage chain
//! - Terminal cleanup of item files
//! - The run orchestrator and its state machine
//! - Run summaries with failure records

mod chains;
mod cleanup;
mod executor;
mod orchestrator;
mod summary;


pub use chains::{thumbnail_chain, upload_chain, UploadTools};
pub use cleanup::finalize_item;
pub use executor::StageChain;
pub use orchestrator::{Orchestrator, RunOutcome, RunState};
pub use summary::{FailureRecord, RunSummary};
