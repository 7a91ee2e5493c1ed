//! Information commands.

use std::path::PathBuf;

use anyhow::Result;
use monorun_core::{DependencyGraph, Scanner};

use crate::formatting::{
    print_project_table, print_section_header, print_warning, ProjectRow, SectionStyle,
};

pub fn cmd_list(root: PathBuf, json: bool) -> Result<()> {
    let workspace = Scanner::new(&root).scan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(workspace.projects())?);
        return Ok(());
    }

    let graph = DependencyGraph::new(&workspace);
    let rows: Vec<ProjectRow> = workspace
        .projects()
        .iter()
        .enumerate()
        .map(|(i, p)| ProjectRow {
            name: p.name.clone(),
            version: p.version().map(str::to_string),
            dirname: p.dirname(),
            private: p.is_private(),
            pipenv: p.pipfile_lock,
            depends_on: graph
                .dependency_names(i)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    print_section_header(
        &format!("{} projects in {}", workspace.len(), workspace.root().display()),
        SectionStyle::Primary,
    );
    print_project_table(&rows);
    println!();

    for cycle in graph.cycles() {
        print_warning(&format!("Dependency cycle: {}", cycle.join(" ↔ ")));
    }

    Ok(())
}
