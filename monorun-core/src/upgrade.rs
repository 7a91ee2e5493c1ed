//! Version bumps driven by conventional commit subjects.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use tracing::{debug, info};

use crate::config::UpgradeConfig;
use crate::error::{Error, Result};
use crate::manifest::{read_version_field, replace_version_field, Manifest};
use crate::project::Project;
use crate::publish::{PublishOutcome, Publisher};
use crate::reporter::Reporter;
use crate::runner::CommandExecutor;
use crate::workspace::Workspace;

static FEAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^feat(\(.+\))?:").expect("valid feat regex"));
static FIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^fix(\(.+\))?:").expect("valid fix regex"));

/// Feature and fix commits found since the last version bump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub feat: u64,
    pub fix: u64,
}

impl ChangeCounts {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.feat == 0 && self.fix == 0
    }
}

/// Counts `feat` and `fix` subjects, newest first, up to the first subject
/// equal to `stop_marker`.
pub fn count_changes<'s, I>(subjects: I, stop_marker: &str) -> ChangeCounts
where
    I: IntoIterator<Item = &'s str>,
{
    let mut counts = ChangeCounts::default();
    for subject in subjects {
        if subject == stop_marker {
            break;
        }
        if FEAT.is_match(subject) {
            counts.feat += 1;
        } else if FIX.is_match(subject) {
            counts.fix += 1;
        }
    }
    counts
}

/// Computes the bumped version, or `None` when nothing warrants a bump.
///
/// Features add to the minor field and reset patch to the number of fixes;
/// fixes alone add to the patch field.
pub fn next_version(current: &Version, counts: ChangeCounts) -> Option<Version> {
    if counts.feat > 0 {
        Some(Version::new(
            current.major,
            current.minor + counts.feat,
            counts.fix,
        ))
    } else if counts.fix > 0 {
        Some(Version::new(
            current.major,
            current.minor,
            current.patch + counts.fix,
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// No feat or fix commit since the last bump.
    Unchanged,
    Bumped {
        old: String,
        new: String,
        counts: ChangeCounts,
        publish: PublishOutcome,
    },
}

/// Bumps, commits and publishes one project at a time.
pub struct Upgrader<'a> {
    executor: &'a dyn CommandExecutor,
    publisher: &'a Publisher<'a>,
    reporter: Arc<dyn Reporter>,
    config: UpgradeConfig,
}

impl<'a> Upgrader<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        publisher: &'a Publisher<'a>,
        reporter: Arc<dyn Reporter>,
        config: UpgradeConfig,
    ) -> Self {
        Self {
            executor,
            publisher,
            reporter,
            config,
        }
    }

    fn log_command(&self) -> String {
        format!(
            r#"git log --oneline --pretty=format:"%s" -{}"#,
            self.config.log_depth
        )
    }

    /// Reads recent history of the project and, when it contains features or
    /// fixes, rewrites the manifest version, commits it and publishes.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be spawned, or the manifest has
    /// no version field or an unparseable version.
    pub async fn upgrade(&self, project: &Project) -> Result<UpgradeOutcome> {
        let log = self.executor.run(&self.log_command(), &project.dir).await?;
        let counts = count_changes(log.lines(), &self.config.stop_marker);
        debug!(project = %project.name, feat = counts.feat, fix = counts.fix, "counted commits");
        if counts.is_empty() {
            return Ok(UpgradeOutcome::Unchanged);
        }

        let manifest_path = project.manifest_path();
        let text = std::fs::read_to_string(&manifest_path)?;
        let old = read_version_field(&text)
            .ok_or_else(|| Error::VersionNotFound(manifest_path.clone()))?
            .to_string();
        let current = Version::parse(&old).map_err(|e| Error::InvalidVersion {
            version: old.clone(),
            message: e.to_string(),
        })?;
        let new = match next_version(&current, counts) {
            Some(version) => version.to_string(),
            None => return Ok(UpgradeOutcome::Unchanged),
        };

        let patched = replace_version_field(&text, &new)
            .ok_or_else(|| Error::VersionNotFound(manifest_path.clone()))?;
        std::fs::write(&manifest_path, &patched)?;
        info!(project = %project.name, old = %old, new = %new, "bumped version");
        self.reporter.version_bumped(&project.name, &old, &new);

        self.executor.run("git add .", &project.dir).await?;
        self.executor
            .run(
                &format!(r#"git commit -m "{}""#, self.config.commit_message),
                &project.dir,
            )
            .await?;

        // Publish what was just committed: the registry is compared against
        // the bumped version, not the one read at scan time.
        let bumped = Project::new(
            &project.dir,
            Manifest::parse(&patched, &manifest_path)?,
            project.pipfile_lock,
        );
        let publish = self.publisher.publish(&bumped).await;

        Ok(UpgradeOutcome::Bumped {
            old,
            new,
            counts,
            publish,
        })
    }

    /// Upgrades every project in registry order, stopping at the first error.
    pub async fn upgrade_all(
        &self,
        workspace: &Workspace,
    ) -> Result<Vec<(String, UpgradeOutcome)>> {
        let mut outcomes = Vec::with_capacity(workspace.len());
        for project in workspace.projects() {
            let outcome = self.upgrade(project).await?;
            outcomes.push((project.name.clone(), outcome));
        }
        Ok(outcomes)
    }
}
