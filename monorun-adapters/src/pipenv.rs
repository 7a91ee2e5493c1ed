//! Pipenv adapter for projects that also carry a Python environment.
//!
//! A project is treated as pipenv-managed when a `Pipfile.lock` sits next to
//! its `package.json`. Builds stay with the Node package manager.

use monorun_core::adapter::{EcosystemAdapter, MaintenanceTask};
use monorun_core::project::Project;

pub struct PipenvAdapter;

impl EcosystemAdapter for PipenvAdapter {
    fn name(&self) -> &'static str {
        "pipenv"
    }

    fn detect(&self, project: &Project) -> bool {
        project.pipfile_lock
    }

    fn command(&self, task: MaintenanceTask, _project: &Project) -> Option<String> {
        match task {
            MaintenanceTask::Install => Some("pipenv run pipenv sync".to_string()),
            MaintenanceTask::Update => Some("pipenv run pipenv update".to_string()),
            MaintenanceTask::Build => None,
        }
    }
}
