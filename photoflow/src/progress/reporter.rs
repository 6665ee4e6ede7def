//! Progress reporter trait and implementations.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Item status: position, total, then the message fitted to the terminal.
const STATUS_TEMPLATE: &str = "[{pos}/{len}] {wide_msg}";
/// Completion line.
const FINAL_TEMPLATE: &str = "{wide_msg}";

/// Receives progress from the orchestrator.
///
/// Implementations must not fail; write errors are ignored.
pub trait ProgressReporter: Send {
    /// Reports that item `index` of `total` is being processed.
    fn status(&mut self, index: usize, total: usize, message: &str);

    /// Reports the end of the run.
    fn finish(&mut self, message: &str);
}

/// A reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl ProgressReporter for NoOpReporter {
    fn status(&mut self, _index: usize, _total: usize, _message: &str) {}

    fn finish(&mut self, _message: &str) {}
}

/// Draws a single status line that is overwritten per item.
///
/// The line is sized to the terminal in display columns, so wide
/// characters never make it wrap. Nothing is drawn when the target is not
/// a terminal.
pub struct TerminalReporter {
    bar: ProgressBar,
}

impl TerminalReporter {
    /// Reports to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(ProgressDrawTarget::stdout())
    }

    /// Creates a reporter drawing to `target`.
    #[must_use]
    pub fn new(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(style(STATUS_TEMPLATE));
        Self { bar }
    }

    /// Returns the underlying progress bar.
    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Messages come from file names; control characters would break the line.
fn single_line(message: &str) -> String {
    message.chars().filter(|c| !c.is_control()).collect()
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for TerminalReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalReporter")
            .field("position", &self.bar.position())
            .field("length", &self.bar.length())
            .finish_non_exhaustive()
    }
}

impl ProgressReporter for TerminalReporter {
    fn status(&mut self, index: usize, total: usize, message: &str) {
        self.bar.set_length(to_u64(total));
        self.bar.set_position(to_u64(index));
        self.bar.set_message(single_line(message));
    }

    fn finish(&mut self, message: &str) {
        self.bar.set_style(style(FINAL_TEMPLATE));
        self.bar.finish_with_message(single_line(message));
    }
}

/// Records reported progress, for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    statuses: Vec<(usize, usize, String)>,
    finals: Vec<String>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every `(index, total, message)` reported.
    #[must_use]
    pub fn statuses(&self) -> &[(usize, usize, String)] {
        &self.statuses
    }

    /// Returns every completion message reported.
    #[must_use]
    pub fn finals(&self) -> &[String] {
        &self.finals
    }
}

impl ProgressReporter for CollectingReporter {
    fn status(&mut self, index: usize, total: usize, message: &str) {
        self.statuses.push((index, total, message.to_string()));
    }

    fn finish(&mut self, message: &str) {
        self.finals.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::InMemoryTerm;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_terminal_reporter_tracks_items() {
        let mut reporter = TerminalReporter::new(ProgressDrawTarget::hidden());
        reporter.status(1, 2, "a.jpg");
        reporter.status(2, 2, "b\r\nc.jpg");

        assert_eq!(reporter.bar().position(), 2);
        assert_eq!(reporter.bar().length(), Some(2));
        assert_eq!(reporter.bar().message(), "bc.jpg");
        assert!(!reporter.bar().is_finished());

        reporter.finish("Done");
        assert!(reporter.bar().is_finished());
        assert_eq!(reporter.bar().message(), "Done");
    }

    #[test]
    fn test_wide_names_never_wrap() {
        let term = InMemoryTerm::new(4, 20);
        let mut reporter =
            TerminalReporter::new(ProgressDrawTarget::term_like(Box::new(term.clone())));

        reporter.status(1, 1, "写真写真写真写真写真写真.jpg");
        reporter.finish("Done 写真写真写真写真写真写真.jpg");

        let screen = term.contents();
        assert_eq!(screen.lines().count(), 1);
        assert!(screen.starts_with("Done 写真"));
    }

    #[test]
    fn test_collecting_reporter() {
        let mut reporter = CollectingReporter::new();
        reporter.status(1, 5, "x");
        reporter.finish("end");

        assert_eq!(reporter.statuses(), &[(1, 5, "x".to_string())]);
        assert_eq!(reporter.finals(), &["end".to_string()]);
    }
}
