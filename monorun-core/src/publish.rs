//! Build-and-publish of projects whose local version is not on the registry.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PackageManagerConfig;
use crate::error::Result;
use crate::npm::PackageRegistry;
use crate::processes::LiveProcesses;
use crate::project::Project;
use crate::reporter::Reporter;
use crate::runner::CommandExecutor;
use crate::workspace::Workspace;

/// Which command published the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    /// `<pm> run upload`
    Upload,
    /// `<pm> run upload-python`
    UploadPython,
    /// `<pm> publish`
    Publish,
}

impl PublishStep {
    /// Picks the publish command declared by the manifest, in priority order
    /// `upload`, `upload-python`, then the package manager's own publish.
    pub fn for_project(project: &Project) -> Self {
        if project.manifest.has_script("upload") {
            PublishStep::Upload
        } else if project.manifest.has_script("upload-python") {
            PublishStep::UploadPython
        } else {
            PublishStep::Publish
        }
    }

    pub fn command(&self, pm: &PackageManagerConfig) -> String {
        match self {
            PublishStep::Upload => pm.run_script("upload"),
            PublishStep::UploadPython => pm.run_script("upload-python"),
            PublishStep::Publish => pm.subcommand("publish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Private,
    NoLocalVersion,
}

/// Result of publishing one project. Failures are never propagated; they end
/// up as [`PublishOutcome::Ignored`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        local: String,
        remote: String,
        step: PublishStep,
    },
    UpToDate {
        version: String,
    },
    Skipped(SkipReason),
    Ignored {
        error: String,
    },
}

/// Compares manifest versions against the registry and publishes the
/// projects that differ.
pub struct Publisher<'a> {
    registry: &'a dyn PackageRegistry,
    executor: &'a dyn CommandExecutor,
    reporter: Arc<dyn Reporter>,
    package_manager: PackageManagerConfig,
    live: Option<LiveProcesses>,
}

impl<'a> Publisher<'a> {
    pub fn new(
        registry: &'a dyn PackageRegistry,
        executor: &'a dyn CommandExecutor,
        reporter: Arc<dyn Reporter>,
        package_manager: PackageManagerConfig,
    ) -> Self {
        Self {
            registry,
            executor,
            reporter,
            package_manager,
            live: None,
        }
    }

    /// Stops `publish_all` once termination of `live` is requested.
    pub fn with_live_processes(mut self, live: LiveProcesses) -> Self {
        self.live = Some(live);
        self
    }

    /// Publishes one project if its local version differs from the latest
    /// published one.
    pub async fn publish(&self, project: &Project) -> PublishOutcome {
        if project.is_private() {
            debug!(project = %project.name, "private project, not publishing");
            return PublishOutcome::Skipped(SkipReason::Private);
        }
        let Some(local) = project.version() else {
            debug!(project = %project.name, "no local version, not publishing");
            return PublishOutcome::Skipped(SkipReason::NoLocalVersion);
        };

        match self.publish_inner(project, local).await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(project = %project.name, error = %e, "publish failed, ignoring");
                PublishOutcome::Ignored {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn publish_inner(&self, project: &Project, local: &str) -> Result<PublishOutcome> {
        let remote = self.registry.latest_version(&project.name).await?;
        self.reporter.versions_compared(&project.name, local, &remote);

        if remote == local {
            return Ok(PublishOutcome::UpToDate { version: remote });
        }

        info!(project = %project.name, local, remote = %remote, "publishing");
        self.executor
            .run(&self.package_manager.run_script("build"), &project.dir)
            .await?;

        let step = PublishStep::for_project(project);
        self.executor
            .run(&step.command(&self.package_manager), &project.dir)
            .await?;

        Ok(PublishOutcome::Published {
            local: local.to_string(),
            remote,
            step,
        })
    }

    /// Publishes every project of the workspace sequentially.
    pub async fn publish_all(&self, workspace: &Workspace) -> Vec<(String, PublishOutcome)> {
        let mut outcomes = Vec::with_capacity(workspace.len());
        for project in workspace.projects() {
            if self.live.as_ref().is_some_and(|l| l.is_terminated()) {
                break;
            }
            let outcome = self.publish(project).await;
            outcomes.push((project.name.clone(), outcome));
        }
        outcomes
    }
}
