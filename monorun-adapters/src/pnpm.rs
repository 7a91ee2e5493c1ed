use monorun_core::adapter::{EcosystemAdapter, MaintenanceTask};
use monorun_core::config::PackageManagerConfig;
use monorun_core::project::Project;

/// Adapter for the Node package manager driving every project (pnpm by
/// default).
pub struct PnpmAdapter {
    package_manager: PackageManagerConfig,
}

impl PnpmAdapter {
    pub fn new(package_manager: PackageManagerConfig) -> Self {
        Self { package_manager }
    }
}

impl Default for PnpmAdapter {
    fn default() -> Self {
        Self::new(PackageManagerConfig::default())
    }
}

impl EcosystemAdapter for PnpmAdapter {
    fn name(&self) -> &'static str {
        "pnpm"
    }

    fn detect(&self, _project: &Project) -> bool {
        true
    }

    fn command(&self, task: MaintenanceTask, project: &Project) -> Option<String> {
        match task {
            MaintenanceTask::Install => Some(self.package_manager.subcommand("install")),
            MaintenanceTask::Update => Some(self.package_manager.subcommand("update")),
            MaintenanceTask::Build => project
                .manifest
                .has_script("build")
                .then(|| self.package_manager.run_script("build")),
        }
    }
}
