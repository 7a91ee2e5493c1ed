//! Project data model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

/// Lockfile whose presence marks a project as also managed by pipenv.
pub const PIPFILE_LOCK: &str = "Pipfile.lock";

/// A sub-project of the monorepo: one directory holding a `package.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub dir: PathBuf,
    pub manifest: Manifest,
    pub pipfile_lock: bool,
}

impl Project {
    pub fn new(dir: impl Into<PathBuf>, manifest: Manifest, pipfile_lock: bool) -> Self {
        Self {
            name: manifest.name.clone(),
            dir: dir.into(),
            manifest,
            pipfile_lock,
        }
    }

    /// Base name of the project directory, used to label console output.
    pub fn dirname(&self) -> String {
        dir_label(&self.dir)
    }

    #[inline]
    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.manifest.private
    }

    #[inline]
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(crate::manifest::MANIFEST_FILE)
    }
}

/// Base name of a directory, falling back to the full path when it has none.
pub fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
