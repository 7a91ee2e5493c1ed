//! Core library for monorepo maintenance workflows.

pub mod adapter;
pub mod config;
pub mod error;
pub mod graph;
pub mod maintenance;
pub mod manifest;
pub mod npm;
pub mod orchestrator;
pub mod processes;
pub mod project;
pub mod publish;
pub mod reporter;
pub mod runner;
pub mod scanner;
pub mod upgrade;
pub mod workspace;

pub use adapter::{EcosystemAdapter, MaintenanceTask};
pub use config::Config;
pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use maintenance::{Maintenance, StepReport};
pub use manifest::Manifest;
pub use npm::{NpmRegistry, PackageRegistry};
pub use orchestrator::{Orchestrator, StartState};
pub use processes::{LiveProcess, LiveProcesses};
pub use project::Project;
pub use publish::{PublishOutcome, PublishStep, Publisher, SkipReason};
pub use reporter::{NullReporter, OutputStream, Reporter};
pub use runner::{CommandExecutor, CommandOutput, LaunchHandle, ProcessRunner};
pub use scanner::Scanner;
pub use upgrade::{count_changes, next_version, ChangeCounts, UpgradeOutcome, Upgrader};
pub use workspace::Workspace;
