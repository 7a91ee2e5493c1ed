pub mod pipenv;
pub mod pnpm;

pub use pipenv::PipenvAdapter;
pub use pnpm::PnpmAdapter;

use monorun_core::adapter::EcosystemAdapter;
use monorun_core::config::Config;

/// Adapters in the order their commands run for each project: the Python
/// environment first, then the Node package manager.
pub fn default_adapters(config: &Config) -> Vec<Box<dyn EcosystemAdapter>> {
    vec![
        Box::new(PipenvAdapter),
        Box::new(PnpmAdapter::new(config.package_manager.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use monorun_core::adapter::MaintenanceTask;
    use monorun_core::manifest::Manifest;
    use monorun_core::project::Project;

    use super::*;

    fn project(manifest: &str, pipfile_lock: bool) -> Project {
        let manifest = Manifest::parse(manifest, Path::new("app/package.json")).unwrap();
        Project::new("app", manifest, pipfile_lock)
    }

    fn commands(project: &Project, task: MaintenanceTask) -> Vec<String> {
        default_adapters(&Config::default())
            .iter()
            .filter(|a| a.detect(project))
            .filter_map(|a| a.command(task, project))
            .collect()
    }

    #[test]
    fn test_install_runs_pipenv_before_pnpm() {
        let project = project(r#"{"name": "app"}"#, true);
        assert_eq!(
            commands(&project, MaintenanceTask::Install),
            vec!["pipenv run pipenv sync", "pnpm install"]
        );
        assert_eq!(
            commands(&project, MaintenanceTask::Update),
            vec!["pipenv run pipenv update", "pnpm update"]
        );
    }

    #[test]
    fn test_pipenv_ignored_without_lockfile() {
        let project = project(r#"{"name": "app"}"#, false);
        assert_eq!(commands(&project, MaintenanceTask::Install), vec!["pnpm install"]);
    }

    #[test]
    fn test_build_requires_build_script() {
        let without = project(r#"{"name": "app", "scripts": {"start": "node ."}}"#, true);
        assert!(commands(&without, MaintenanceTask::Build).is_empty());

        let with = project(r#"{"name": "app", "scripts": {"build": "tsc"}}"#, true);
        assert_eq!(commands(&with, MaintenanceTask::Build), vec!["pnpm run build"]);
    }

    #[test]
    fn test_package_manager_is_configurable() {
        let mut config = Config::default();
        config.package_manager.command = "npm".to_string();
        let adapter = PnpmAdapter::new(config.package_manager);
        let project = project(r#"{"name": "app"}"#, false);

        assert_eq!(
            adapter.command(MaintenanceTask::Update, &project),
            Some("npm update".to_string())
        );
    }
}
