//! Shared plumbing for the photoflow command line tools.

#![allow(missing_docs)]

pub mod thumbs;
pub mod upload;

use clap::error::ErrorKind;
use clap::Parser;
use photoflow::errors::{PhotoflowError, EXIT_FAILURE, EXIT_SUCCESS};
use photoflow::pipeline::{RunOutcome, RunSummary};
use photoflow::progress::{NoOpReporter, ProgressReporter, TerminalReporter};
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "PHOTOFLOW_LOG";

/// Filter used when `PHOTOFLOW_LOG` is unset.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the stderr subscriber. Stdout carries the status line.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, stopping"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, stopping");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Parses arguments, printing help, version or usage errors.
///
/// Returns the exit code to use when parsing did not produce arguments:
/// `0` for help and version, `1` for anything else.
pub fn parse_from<T, I, A>(args: I) -> Result<T, u8>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => EXIT_SUCCESS,
            _ => EXIT_FAILURE,
        }
    })
}

/// Progress on stdout, or nothing when quiet.
pub fn reporter(quiet: bool) -> Box<dyn ProgressReporter> {
    if quiet {
        Box::new(NoOpReporter)
    } else {
        Box::new(TerminalReporter::stdout())
    }
}

/// Writes the summary as pretty JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    use anyhow::Context;

    let json = summary.to_json().context("serializing run summary")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Reports the run result on stderr and selects the exit code.
pub fn conclude(
    result: Result<RunOutcome, PhotoflowError>,
    summary_json: Option<&Path>,
) -> ExitCode {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, PhotoflowError::Usage(_)) {
                eprintln!("For more information, try '--help'.");
            }
            return ExitCode::from(e.exit_code());
        }
    };

    let summary = outcome.summary();
    if summary.has_failures() {
        eprintln!("Failed items ({}):", summary.failed.len());
        for record in &summary.failures {
            eprintln!("  {}: {}", record.item, record.error);
        }
    }
    if outcome.is_interrupted() {
        eprintln!("Interrupted after {} of {} items", summary.completed(), summary.total);
    }

    let mut code = outcome.exit_code();
    if let Some(path) = summary_json {
        if let Err(e) = write_summary(path, summary) {
            eprintln!("Error: {e:#}");
            if code == EXIT_SUCCESS {
                code = EXIT_FAILURE;
            }
        }
    }
    ExitCode::from(code)
}
