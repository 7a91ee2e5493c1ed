//! Trait for reporting workflow progress.

use std::path::Path;

/// Which pipe of a child process a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Receives user-facing progress from the runner and the workflows.
///
/// This lets the core library report commands, their output and version
/// decisions without writing to stdout/stderr itself.
pub trait Reporter: Send + Sync {
    /// A command is about to be spawned in `dir`.
    fn command_started(&self, dir: &Path, command: &str);

    /// One non-empty line of output from a command running in `dir`.
    fn output_line(&self, dir: &Path, line: &str, stream: OutputStream);

    /// A command running in `dir` exited. `exit_code` is `None` when the
    /// process was terminated by a signal.
    fn command_finished(&self, dir: &Path, exit_code: Option<i32>);

    /// The local manifest version of `project` was compared to the registry.
    fn versions_compared(&self, _project: &str, _local: &str, _remote: &str) {}

    /// The manifest version of `project` was rewritten.
    fn version_bumped(&self, _project: &str, _old: &str, _new: &str) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn command_started(&self, _dir: &Path, _command: &str) {}

    fn output_line(&self, _dir: &Path, _line: &str, _stream: OutputStream) {}

    fn command_finished(&self, _dir: &Path, _exit_code: Option<i32>) {}
}
