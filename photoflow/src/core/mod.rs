//! Core domain model types for photoflow.
//!
//! - Item outcome and stage status enums
//! - The work item flowing through the stage chain

mod item;
mod status;

pub use item::{ItemId, WorkItem};
pub use status::{ItemOutcome, StageStatus};
