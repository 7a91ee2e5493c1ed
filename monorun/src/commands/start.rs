//! Dependency-ordered start of every project.

use std::path::PathBuf;

use anyhow::Result;
use monorun_core::{DependencyGraph, Orchestrator};
use owo_colors::OwoColorize;

use crate::formatting::{
    print_error, print_key_value, print_section_header, print_warning, SectionStyle,
};

use super::Session;

pub fn cmd_start(root: PathBuf, dry_run: bool) -> Result<()> {
    let session = Session::open(root)?;

    for cycle in DependencyGraph::new(&session.workspace).cycles() {
        print_warning(&format!("Dependency cycle: {}", cycle.join(" ↔ ")));
    }

    let mut orchestrator = Orchestrator::new(&session.workspace, session.config.start_command());

    if dry_run {
        print_section_header("Start order (dry run)", SectionStyle::Primary);
        for (i, name) in orchestrator.plan().iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).bright_black(), name.bold().white());
        }
        println!();
        return Ok(());
    }

    print_section_header("Starting projects", SectionStyle::Primary);
    print_key_value("Command", &session.config.start_command());
    println!("  Press Ctrl+C to stop");
    println!();

    let handles = {
        let _guard = session.runtime.enter();
        orchestrator.start_all(&session.runner)
    };

    session.runtime.block_on(async {
        for handle in handles {
            let dir = handle.dir().display().to_string();
            if let Err(e) = handle.wait().await {
                print_error(&format!("{}: {}", dir, e));
            }
        }
    });

    if session.live().is_terminated() {
        println!();
        print_section_header("Stopped", SectionStyle::Warning);
    }

    Ok(())
}
