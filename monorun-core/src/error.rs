//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Invalid manifest {path}: {error}")]
    Manifest {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("Duplicate project name '{name}' in {first} and {second}")]
    DuplicateProject {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to spawn '{command}' in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to wait for '{command}': {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },

    #[error("Interrupted: not starting '{0}'")]
    Interrupted(String),

    #[error("Registry error for {package}: {message}")]
    Registry { package: String, message: String },

    #[error("Version field not found in {0}")]
    VersionNotFound(PathBuf),

    #[error("Invalid version {version}: {message}")]
    InvalidVersion { version: String, message: String },

    #[error("Background task for '{command}' failed: {message}")]
    Join { command: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
