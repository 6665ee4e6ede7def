//! Progress reporting.
//!
//! The orchestrator reports one overwritten status line per item and a
//! persistent completion line at the end. Reporting is presentation only:
//! a reporter never fails the run.

mod reporter;

pub use reporter::{CollectingReporter, NoOpReporter, ProgressReporter, TerminalReporter};
