//! The set of projects discovered under one root directory.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::project::Project;

/// Projects of a monorepo in registry order, indexed by manifest name.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    root: PathBuf,
    projects: Vec<Project>,
    index: FxHashMap<String, usize>,
}

impl Workspace {
    /// Builds a workspace from projects in registry order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProject` if two projects share a manifest name.
    pub fn new(root: impl Into<PathBuf>, projects: Vec<Project>) -> Result<Self> {
        let mut index = FxHashMap::default();
        for (i, project) in projects.iter().enumerate() {
            if let Some(&first) = index.get(&project.name) {
                let first: &Project = &projects[first];
                return Err(Error::DuplicateProject {
                    name: project.name.clone(),
                    first: first.dir.clone(),
                    second: project.dir.clone(),
                });
            }
            index.insert(project.name.clone(), i);
        }

        Ok(Self {
            root: root.into(),
            projects,
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Project> {
        self.index.get(name).map(|&i| &self.projects[i])
    }

    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
