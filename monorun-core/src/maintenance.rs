//! Install, update and build across every project.

use tracing::{info, warn};

use crate::adapter::{EcosystemAdapter, MaintenanceTask};
use crate::error::Result;
use crate::runner::CommandExecutor;
use crate::workspace::Workspace;

/// One command issued by a maintenance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub project: String,
    pub adapter: &'static str,
    pub command: String,
    pub exit_code: Option<i32>,
}

impl StepReport {
    #[inline]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a [`MaintenanceTask`] through a list of adapters, project by project.
///
/// Adapters are consulted in the given order for each project; every
/// command is awaited before the next one starts.
pub struct Maintenance<'a> {
    executor: &'a dyn CommandExecutor,
    adapters: &'a [Box<dyn EcosystemAdapter>],
}

impl<'a> Maintenance<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        adapters: &'a [Box<dyn EcosystemAdapter>],
    ) -> Self {
        Self { executor, adapters }
    }

    /// # Errors
    ///
    /// Returns the first spawn error. Non-zero exit codes are recorded in the
    /// returned reports and do not stop the run.
    pub async fn run(
        &self,
        workspace: &Workspace,
        task: MaintenanceTask,
    ) -> Result<Vec<StepReport>> {
        let mut reports = Vec::new();

        for project in workspace.projects() {
            for adapter in self.adapters.iter().filter(|a| a.detect(project)) {
                let Some(command) = adapter.command(task, project) else {
                    continue;
                };

                info!(
                    project = %project.name,
                    adapter = adapter.name(),
                    task = task.as_str(),
                    "running"
                );
                let output = self.executor.run(&command, &project.dir).await?;
                if !output.success() {
                    warn!(
                        project = %project.name,
                        command = %command,
                        exit_code = ?output.exit_code,
                        "command exited unsuccessfully"
                    );
                }

                reports.push(StepReport {
                    project: project.name.clone(),
                    adapter: adapter.name(),
                    command,
                    exit_code: output.exit_code,
                });
            }
        }

        Ok(reports)
    }
}
