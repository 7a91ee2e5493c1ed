//! TOML configuration for the maintenance workflows.
//!
//! Read from an optional `monorun.toml` in the scanned root. Every key has a
//! default, so an absent file and an empty file behave the same.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the optional configuration in the scanned root.
pub const CONFIG_FILE: &str = "monorun.toml";

/// Subject of the commit created by a version bump; also where commit
/// counting stops.
pub const UPGRADE_COMMIT_MESSAGE: &str = "chore: upgrade package version";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub package_manager: PackageManagerConfig,
    pub registry: RegistryConfig,
    pub start: StartConfig,
    pub upgrade: UpgradeConfig,
}

/// Which package manager CLI the workflows drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    pub command: String,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            command: "pnpm".to_string(),
        }
    }
}

impl PackageManagerConfig {
    /// `<pm> run <script>`.
    pub fn run_script(&self, script: &str) -> String {
        format!("{} run {}", self.command, script)
    }

    /// `<pm> <subcommand>`.
    pub fn subcommand(&self, subcommand: &str) -> String {
        format!("{} {}", self.command, subcommand)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
    /// Request timeout in seconds; requests never time out when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: "https://registry.npmjs.org".to_string(),
            timeout_secs: None,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    /// Script run by `start` in every project.
    pub script: String,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            script: "start".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub stop_marker: String,
    pub commit_message: String,
    /// How many commits of history are inspected per project.
    pub log_depth: usize,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            stop_marker: UPGRADE_COMMIT_MESSAGE.to_string(),
            commit_message: UPGRADE_COMMIT_MESSAGE.to_string(),
            log_depth: 20,
        }
    }
}

impl Config {
    /// Loads `monorun.toml` from `root`, or the defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|error| Error::Toml {
            error,
            context: path.display().to_string(),
        })
    }

    /// Command that starts one project.
    pub fn start_command(&self) -> String {
        self.package_manager.run_script(&self.start.script)
    }
}
