//! Shell command execution with streamed, line-oriented output.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::processes::LiveProcesses;
use crate::reporter::{OutputStream, Reporter};

/// What a finished command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[inline]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Trimmed, non-empty stdout lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// How long output pumps may run once their process group has been killed.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

type Completion = Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'static>>;

/// A command that was started in the background.
///
/// The process runs whether or not the handle is awaited.
pub struct LaunchHandle {
    command: String,
    dir: PathBuf,
    completion: Completion,
}

impl LaunchHandle {
    pub fn new<F>(command: impl Into<String>, dir: impl Into<PathBuf>, completion: F) -> Self
    where
        F: Future<Output = Result<CommandOutput>> + Send + 'static,
    {
        Self {
            command: command.into(),
            dir: dir.into(),
            completion: Box::pin(completion),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Waits for the background command to exit.
    pub async fn wait(self) -> Result<CommandOutput> {
        self.completion.await
    }
}

/// Runs shell commands on behalf of the workflows.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` in `dir` and waits for it to exit.
    ///
    /// A non-zero exit code is not an error; only failing to spawn or wait
    /// for the process is.
    async fn run(&self, command: &str, dir: &Path) -> Result<CommandOutput>;

    /// Starts `command` in `dir` without waiting for it.
    fn launch(&self, command: &str, dir: &Path) -> LaunchHandle;
}

/// Executes commands through the platform shell, streaming their output to a
/// [`Reporter`] and tracking every child in a [`LiveProcesses`] set.
#[derive(Clone)]
pub struct ProcessRunner {
    live: LiveProcesses,
    reporter: Arc<dyn Reporter>,
}

impl ProcessRunner {
    pub fn new(live: LiveProcesses, reporter: Arc<dyn Reporter>) -> Self {
        Self { live, reporter }
    }

    pub fn live(&self) -> &LiveProcesses {
        &self.live
    }
}

#[async_trait]
impl CommandExecutor for ProcessRunner {
    async fn run(&self, command: &str, dir: &Path) -> Result<CommandOutput> {
        execute(
            self.live.clone(),
            Arc::clone(&self.reporter),
            command.to_string(),
            dir.to_path_buf(),
        )
        .await
    }

    /// Must be called from within a tokio runtime.
    fn launch(&self, command: &str, dir: &Path) -> LaunchHandle {
        let handle = tokio::spawn(execute(
            self.live.clone(),
            Arc::clone(&self.reporter),
            command.to_string(),
            dir.to_path_buf(),
        ));
        let command_owned = command.to_string();
        LaunchHandle::new(command, dir, async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(Error::Join {
                    command: command_owned,
                    message: e.to_string(),
                }),
            }
        })
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

async fn execute(
    live: LiveProcesses,
    reporter: Arc<dyn Reporter>,
    command: String,
    dir: PathBuf,
) -> Result<CommandOutput> {
    if live.is_terminated() {
        return Err(Error::Interrupted(command));
    }

    reporter.command_started(&dir, &command);

    let mut shell = shell_command(&command);
    shell
        .current_dir(&dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group, so termination reaches everything the shell spawns.
    #[cfg(unix)]
    shell.process_group(0);
    let mut child = shell.spawn().map_err(|source| Error::Spawn {
        command: command.clone(),
        dir: dir.clone(),
        source,
    })?;

    let pid = child.id();
    let registration = live.register(&command, &dir, pid);

    let stdout_pump = child.stdout.take().map(|out| {
        tokio::spawn(pump(
            out,
            dir.clone(),
            Arc::clone(&reporter),
            OutputStream::Stdout,
        ))
    });
    let stderr_pump = child.stderr.take().map(|err| {
        tokio::spawn(pump(
            err,
            dir.clone(),
            Arc::clone(&reporter),
            OutputStream::Stderr,
        ))
    });

    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = live.terminated() => None,
    };
    let status = match exited {
        Some(status) => status,
        None => {
            debug!(command = %command, ?pid, "killing child on termination request");
            kill_process_group(pid);
            let _ = child.start_kill();
            child.wait().await
        }
    }
    .map_err(|source| Error::Wait {
        command: command.clone(),
        source,
    })?;

    let stdout = drain(stdout_pump, &live, pid).await;
    let stderr = drain(stderr_pump, &live, pid).await;
    drop(registration);

    let exit_code = status.code();
    debug!(command = %command, dir = %dir.display(), ?exit_code, "command finished");
    reporter.command_finished(&dir, exit_code);

    Ok(CommandOutput {
        exit_code,
        stdout,
        stderr,
    })
}

/// Waits for a pump to reach end of output.
///
/// Descendants of the shell can keep the pipe open after the shell exits.
/// Once termination is requested the group is killed again and the pump gets
/// [`DRAIN_TIMEOUT`] to finish before it is aborted.
async fn drain(
    pump: Option<JoinHandle<String>>,
    live: &LiveProcesses,
    pid: Option<u32>,
) -> String {
    let Some(mut handle) = pump else {
        return String::new();
    };

    tokio::select! {
        biased;
        collected = &mut handle => collected.unwrap_or_default(),
        _ = live.terminated() => {
            kill_process_group(pid);
            match tokio::time::timeout(DRAIN_TIMEOUT, &mut handle).await {
                Ok(collected) => collected.unwrap_or_default(),
                Err(_) => {
                    debug!(?pid, "output still open after termination, aborting pump");
                    handle.abort();
                    String::new()
                }
            }
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; ESRCH for a vanished group is fine.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Forwards every non-blank line of `reader` to the reporter and returns the
/// full text read.
async fn pump<R>(
    reader: R,
    dir: PathBuf,
    reporter: Arc<dyn Reporter>,
    stream: OutputStream,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut collected = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let chunk = String::from_utf8_lossy(&buf);
                collected.push_str(&chunk);
                let line = chunk.trim_end_matches(['\n', '\r']);
                if !line.trim().is_empty() {
                    reporter.output_line(&dir, line, stream);
                }
            }
            Err(e) => {
                warn!(dir = %dir.display(), ?stream, error = %e, "failed to read child output");
                break;
            }
        }
    }

    collected
}
