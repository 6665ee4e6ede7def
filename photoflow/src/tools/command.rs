//! Running external programs.

use std::ffi::{OsStr, OsString};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::errors::ToolError;

/// A program invocation whose failure is reported as a [`ToolError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Creates a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Runs the program to completion and returns its standard output.
    ///
    /// The child is killed if the returned future is dropped.
    pub async fn output(&self) -> Result<String, ToolError> {
        debug!(program = %self.program, args = ?self.args, "Running external command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ToolError::failed(
                &self.program,
                output.status.to_string(),
                String::from_utf8_lossy(&output.stderr).trim(),
            ))
        }
    }

    /// Runs the program, discarding its output.
    pub async fn run(&self) -> Result<(), ToolError> {
        self.output().await.map(|_| ())
    }
}
