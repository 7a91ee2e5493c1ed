//! Command implementations for the CLI.

mod info;
mod maintenance;
mod publish;
mod start;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use monorun_core::{Config, LiveProcesses, ProcessRunner, Reporter, Scanner, Workspace};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::reporter::ConsoleReporter;

pub use info::cmd_list;
pub use maintenance::cmd_maintenance;
pub use publish::{cmd_publish, cmd_upgrade};
pub use start::cmd_start;

/// Everything a workflow command needs for one invocation.
///
/// Dropping the session requests termination of every child it spawned.
struct Session {
    config: Config,
    workspace: Workspace,
    reporter: Arc<dyn Reporter>,
    runner: ProcessRunner,
    runtime: Runtime,
}

impl Session {
    fn open(root: PathBuf) -> Result<Self> {
        let config = Config::load(&root)?;
        let workspace = Scanner::new(&root).scan()?;
        debug!(root = %root.display(), projects = workspace.len(), "workspace loaded");

        let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(&workspace));
        let live = LiveProcesses::new();
        install_interrupt_handler(live.clone())?;
        let runner = ProcessRunner::new(live, Arc::clone(&reporter));

        let runtime = Runtime::new()
            .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

        Ok(Self {
            config,
            workspace,
            reporter,
            runner,
            runtime,
        })
    }

    fn live(&self) -> &LiveProcesses {
        self.runner.live()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.runner.live().terminate_all();
    }
}

/// First Ctrl+C terminates the children; a second one exits immediately.
fn install_interrupt_handler(live: LiveProcesses) -> Result<()> {
    ctrlc::set_handler(move || {
        if live.is_terminated() {
            std::process::exit(130);
        }
        live.terminate_all();
    })
    .map_err(|e| anyhow::anyhow!("Failed to set signal handler: {}", e))
}
