//! Ecosystem adapter trait for per-project maintenance commands.

use crate::project::Project;

/// A maintenance action applied to every project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenanceTask {
    /// Install dependencies from lockfiles.
    Install,
    /// Update dependencies.
    Update,
    /// Build the project.
    Build,
}

impl MaintenanceTask {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceTask::Install => "install",
            MaintenanceTask::Update => "update",
            MaintenanceTask::Build => "build",
        }
    }
}

/// Knows the commands of one package-management ecosystem.
///
/// Adapters only name commands; running them is left to the
/// [`CommandExecutor`](crate::runner::CommandExecutor).
pub trait EcosystemAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the project is managed by this ecosystem.
    fn detect(&self, project: &Project) -> bool;

    /// Command to run for `task`, or `None` when the task does not apply.
    fn command(&self, task: MaintenanceTask, project: &Project) -> Option<String>;
}
