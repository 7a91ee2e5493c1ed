//! Table formatting utilities using comfy-table.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use monorun_core::{PublishOutcome, PublishStep, SkipReason, UpgradeOutcome};

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(*h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        )
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One row of `monorun list`.
pub struct ProjectRow {
    pub name: String,
    pub version: Option<String>,
    pub dirname: String,
    pub private: bool,
    pub pipenv: bool,
    pub depends_on: Vec<String>,
}

pub fn print_project_table(rows: &[ProjectRow]) {
    let mut table = styled_table(&["Project", "Version", "Directory", "Flags", "Depends on"]);

    for row in rows {
        let mut flags = Vec::new();
        if row.private {
            flags.push("private");
        }
        if row.pipenv {
            flags.push("pipenv");
        }
        table.add_row(vec![
            Cell::new(&row.name).fg(Color::White),
            Cell::new(row.version.as_deref().unwrap_or("-")).fg(Color::Cyan),
            Cell::new(&row.dirname).fg(Color::DarkGrey),
            Cell::new(flags.join(", ")).fg(Color::Yellow),
            Cell::new(row.depends_on.join(", ")),
        ]);
    }

    println!("{}", table);
}

fn step_label(step: PublishStep) -> &'static str {
    match step {
        PublishStep::Upload => "upload",
        PublishStep::UploadPython => "upload-python",
        PublishStep::Publish => "publish",
    }
}

fn publish_cells(outcome: &PublishOutcome) -> (Cell, Cell) {
    match outcome {
        PublishOutcome::Published {
            local,
            remote,
            step,
        } => (
            Cell::new("published").fg(Color::Green),
            Cell::new(format!("{} → {} via {}", remote, local, step_label(*step))),
        ),
        PublishOutcome::UpToDate { version } => (
            Cell::new("up to date").fg(Color::DarkGrey),
            Cell::new(version),
        ),
        PublishOutcome::Skipped(SkipReason::Private) => (
            Cell::new("skipped").fg(Color::DarkGrey),
            Cell::new("private"),
        ),
        PublishOutcome::Skipped(SkipReason::NoLocalVersion) => (
            Cell::new("skipped").fg(Color::DarkGrey),
            Cell::new("no version in package.json"),
        ),
        PublishOutcome::Ignored { error } => (
            Cell::new("ignored").fg(Color::Yellow),
            Cell::new(error).fg(Color::Yellow),
        ),
    }
}

pub fn print_publish_table(outcomes: &[(String, PublishOutcome)]) {
    let mut table = styled_table(&["Project", "Result", "Details"]);
    for (name, outcome) in outcomes {
        let (result, details) = publish_cells(outcome);
        table.add_row(vec![Cell::new(name).fg(Color::White), result, details]);
    }
    println!("{}", table);
}

pub fn print_upgrade_table(outcomes: &[(String, UpgradeOutcome)]) {
    let mut table = styled_table(&["Project", "Version", "Commits", "Publish"]);
    for (name, outcome) in outcomes {
        match outcome {
            UpgradeOutcome::Unchanged => {
                table.add_row(vec![
                    Cell::new(name).fg(Color::White),
                    Cell::new("unchanged").fg(Color::DarkGrey),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            UpgradeOutcome::Bumped {
                old,
                new,
                counts,
                publish,
            } => {
                let (result, _) = publish_cells(publish);
                table.add_row(vec![
                    Cell::new(name).fg(Color::White),
                    Cell::new(format!("{} → {}", old, new)).fg(Color::Cyan),
                    Cell::new(format!("{} feat, {} fix", counts.feat, counts.fix)),
                    result,
                ]);
            }
        }
    }
    println!("{}", table);
}
