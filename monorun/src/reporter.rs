//! Console implementation of the core `Reporter`.

use std::collections::HashMap;
use std::path::Path;

use monorun_core::project::dir_label;
use monorun_core::{OutputStream, Reporter, Workspace};
use owo_colors::OwoColorize;
use xxhash_rust::xxh3::xxh3_64;

/// Prints command progress prefixed with `[<dirname>]`, each project in its
/// own color derived from its directory name.
pub struct ConsoleReporter {
    dirnames: HashMap<String, String>,
}

impl ConsoleReporter {
    pub fn new(workspace: &Workspace) -> Self {
        let dirnames = workspace
            .projects()
            .iter()
            .map(|p| (p.name.clone(), p.dirname()))
            .collect();
        Self { dirnames }
    }

    fn label(&self, dir: &Path) -> String {
        let dirname = dir_label(dir);
        format!("[{}]", paint(&dirname, &dirname))
    }

    /// Labels version lines by project name, colored like its output lines.
    fn project_label(&self, project: &str) -> String {
        let dirname = self.dirnames.get(project).map_or(project, String::as_str);
        format!("[{}]", paint(project, dirname))
    }
}

/// Stable color for a project directory, bright enough to read on dark
/// terminals.
pub fn project_color(dirname: &str) -> (u8, u8, u8) {
    let hash = xxh3_64(dirname.as_bytes());
    let channel = |shift: u32| 64 + ((hash >> shift) as u8 % 192);
    (channel(0), channel(8), channel(16))
}

fn paint(text: &str, dirname: &str) -> String {
    let (r, g, b) = project_color(dirname);
    text.truecolor(r, g, b).to_string()
}

impl Reporter for ConsoleReporter {
    fn command_started(&self, dir: &Path, command: &str) {
        println!("{} {}", self.label(dir), command.red());
    }

    fn output_line(&self, dir: &Path, line: &str, stream: OutputStream) {
        match stream {
            OutputStream::Stdout => println!("{} {}", self.label(dir), line),
            OutputStream::Stderr => eprintln!("{} {}", self.label(dir), line),
        }
    }

    fn command_finished(&self, dir: &Path, exit_code: Option<i32>) {
        let code = exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        println!("{} {} {}", self.label(dir), "finished with code".blue(), code);
    }

    fn versions_compared(&self, project: &str, local: &str, remote: &str) {
        let local = if local == remote {
            local.to_string()
        } else {
            local.red().to_string()
        };
        println!(
            "{} local: {} remote: {}",
            self.project_label(project),
            local,
            remote
        );
    }

    fn version_bumped(&self, project: &str, old: &str, new: &str) {
        println!(
            "{} {} → {}",
            self.project_label(project),
            old.bright_black(),
            new.green().bold()
        );
    }
}
