mod commands;
mod formatting;
mod reporter;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use monorun_core::MaintenanceTask;
use tracing::Level;

#[derive(Parser)]
#[command(name = "monorun")]
#[command(about = "Install, build, start and publish every project of a monorepo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(short, long, action, global = true)]
    quiet: bool,
}

#[derive(Args)]
struct RootArg {
    /// Directory whose subdirectories hold the projects
    #[arg(default_value = "..")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Install dependencies of every project
    Install {
        #[command(flatten)]
        root: RootArg,
    },
    /// Update dependencies of every project
    Update {
        #[command(flatten)]
        root: RootArg,
    },
    /// Build every project that declares a build script
    Build {
        #[command(flatten)]
        root: RootArg,
    },
    /// Start every project after its dependencies
    Start {
        #[command(flatten)]
        root: RootArg,
        #[arg(long, action)]
        dry_run: bool,
    },
    /// Build and publish projects whose version is not on the registry
    Publish {
        #[command(flatten)]
        root: RootArg,
    },
    /// Bump versions from commit history, commit and publish
    Upgrade {
        #[command(flatten)]
        root: RootArg,
    },
    /// List the discovered projects
    List {
        #[command(flatten)]
        root: RootArg,
        #[arg(long, action)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Install { root } => {
            commands::cmd_maintenance(root.root, MaintenanceTask::Install)?
        }
        Commands::Update { root } => commands::cmd_maintenance(root.root, MaintenanceTask::Update)?,
        Commands::Build { root } => commands::cmd_maintenance(root.root, MaintenanceTask::Build)?,
        Commands::Start { root, dry_run } => commands::cmd_start(root.root, dry_run)?,
        Commands::Publish { root } => commands::cmd_publish(root.root)?,
        Commands::Upgrade { root } => commands::cmd_upgrade(root.root)?,
        Commands::List { root, json } => commands::cmd_list(root.root, json)?,
    }

    Ok(())
}
