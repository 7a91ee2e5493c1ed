//! Repository scanner for discovering projects.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::project::{Project, PIPFILE_LOCK};
use crate::workspace::Workspace;

/// Scans the immediate subdirectories of a root for `package.json` files.
///
/// Directories without a manifest are skipped. Subdirectories are visited in
/// file-name order so the resulting registry order is stable across runs.
pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scans the root and builds a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be read, a manifest is not valid
    /// JSON, or two manifests declare the same name.
    pub fn scan(&self) -> Result<Workspace> {
        if !self.root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", self.root.display()),
            )
            .into());
        }

        let project_dirs: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.path().to_path_buf())
            .filter(|dir| dir.join(MANIFEST_FILE).is_file())
            .collect();

        let projects: Result<Vec<Project>> = project_dirs
            .into_par_iter()
            .map(|dir| load_project(&dir))
            .collect();
        let projects = projects?;

        debug!(root = %self.root.display(), count = projects.len(), "scanned projects");
        Workspace::new(&self.root, projects)
    }
}

fn load_project(dir: &Path) -> Result<Project> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&manifest_path)?;
    let manifest = Manifest::parse(&content, &manifest_path)?;
    let pipfile_lock = dir.join(PIPFILE_LOCK).exists();
    Ok(Project::new(dir, manifest, pipfile_lock))
}
