//! Install, update and build commands.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use monorun_adapters::default_adapters;
use monorun_core::{Maintenance, MaintenanceTask};

use crate::formatting::{
    format_duration, print_section_header, print_separator_with_spacing, print_success,
    print_summary_box, print_warning, SectionStyle,
};

use super::Session;

fn title(task: MaintenanceTask) -> &'static str {
    match task {
        MaintenanceTask::Install => "Installing dependencies",
        MaintenanceTask::Update => "Updating dependencies",
        MaintenanceTask::Build => "Building projects",
    }
}

pub fn cmd_maintenance(root: PathBuf, task: MaintenanceTask) -> Result<()> {
    let start = Instant::now();
    let session = Session::open(root)?;
    let adapters = default_adapters(&session.config);

    print_section_header(title(task), SectionStyle::Primary);

    let maintenance = Maintenance::new(&session.runner, &adapters);
    let reports = session
        .runtime
        .block_on(maintenance.run(&session.workspace, task))?;

    print_separator_with_spacing();

    let unsuccessful: Vec<String> = reports
        .iter()
        .filter(|r| !r.success())
        .map(|r| format!("{}: {}", r.project, r.command))
        .collect();
    if unsuccessful.is_empty() {
        print_success(&format!("{} commands finished", reports.len()));
    } else {
        print_warning(&format!(
            "{} of {} commands exited unsuccessfully",
            unsuccessful.len(),
            reports.len()
        ));
        for line in &unsuccessful {
            println!("    {}", line);
        }
    }
    println!();

    print_summary_box(
        "Summary",
        &[
            ("Projects", &session.workspace.len().to_string()),
            ("Commands", &reports.len().to_string()),
            ("Duration", &format_duration(start.elapsed().as_secs_f64())),
        ],
    );
    println!();

    Ok(())
}
