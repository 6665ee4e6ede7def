//! Testing utilities for photoflow pipelines.
//!
//! This module provides:
//! - Scripted stages that record how the chain drives them
//! - In-memory image tools that write real output files
//! - Static work sources and catalogs

mod fakes;
mod stages;

pub use fakes::{FailingSource, FakeCall, FakeImageTools, FakeOperation, StaticCatalog};
pub use stages::{RecordingStage, StageBehavior};
