#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use monorun_core::error::{Error, Result};
use monorun_core::manifest::Manifest;
use monorun_core::npm::PackageRegistry;
use monorun_core::project::Project;
use monorun_core::reporter::{OutputStream, Reporter};
use monorun_core::runner::{CommandExecutor, CommandOutput, LaunchHandle};
use monorun_core::workspace::Workspace;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Run,
    Launch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub command: String,
    pub dir: PathBuf,
}

/// Executor that records commands instead of spawning them.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    outputs: Vec<(String, CommandOutput)>,
    failures: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` print `stdout` and exit with 0.
    pub fn with_stdout(mut self, prefix: &str, stdout: &str) -> Self {
        self.outputs.push((
            prefix.to_string(),
            CommandOutput {
                exit_code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
        self
    }

    /// Commands starting with `prefix` exit with `code`.
    pub fn with_exit_code(mut self, prefix: &str, code: i32) -> Self {
        self.outputs.push((
            prefix.to_string(),
            CommandOutput {
                exit_code: Some(code),
                ..Default::default()
            },
        ));
        self
    }

    /// Commands starting with `prefix` fail to spawn.
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    /// Base names of the directories of launched commands, in launch order.
    pub fn launched(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == CallKind::Launch)
            .map(|c| c.dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn record(&self, kind: CallKind, command: &str, dir: &Path) {
        self.calls.lock().unwrap().push(Call {
            kind,
            command: command.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    fn output_for(&self, command: &str) -> CommandOutput {
        self.outputs
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            })
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn run(&self, command: &str, dir: &Path) -> Result<CommandOutput> {
        self.record(CallKind::Run, command, dir);
        if self.failures.iter().any(|p| command.starts_with(p.as_str())) {
            return Err(Error::Spawn {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(self.output_for(command))
    }

    fn launch(&self, command: &str, dir: &Path) -> LaunchHandle {
        self.record(CallKind::Launch, command, dir);
        let output = self.output_for(command);
        LaunchHandle::new(command, dir, async move { Ok(output) })
    }
}

/// Registry answering from a fixed table; unknown packages are errors.
#[derive(Default)]
pub struct FakeRegistry {
    versions: HashMap<String, String>,
    queries: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, package: &str, version: &str) -> Self {
        self.versions
            .insert(package.to_string(), version.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageRegistry for FakeRegistry {
    async fn latest_version(&self, package: &str) -> Result<String> {
        self.queries.lock().unwrap().push(package.to_string());
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| Error::Registry {
                package: package.to_string(),
                message: "404 Not Found".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Line(String, OutputStream),
    Finished(Option<i32>),
    Compared(String, String, String),
    Bumped(String, String, String),
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines(&self, stream: OutputStream) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Line(line, s) if s == stream => Some(line),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn command_started(&self, _dir: &Path, command: &str) {
        self.push(Event::Started(command.to_string()));
    }

    fn output_line(&self, _dir: &Path, line: &str, stream: OutputStream) {
        self.push(Event::Line(line.to_string(), stream));
    }

    fn command_finished(&self, _dir: &Path, exit_code: Option<i32>) {
        self.push(Event::Finished(exit_code));
    }

    fn versions_compared(&self, project: &str, local: &str, remote: &str) {
        self.push(Event::Compared(
            project.to_string(),
            local.to_string(),
            remote.to_string(),
        ));
    }

    fn version_bumped(&self, project: &str, old: &str, new: &str) {
        self.push(Event::Bumped(project.to_string(), old.to_string(), new.to_string()));
    }
}

/// Builds a project living in `/repo/<name>` from a manifest JSON value.
pub fn project_from(manifest: Value) -> Project {
    let manifest: Manifest = serde_json::from_value(manifest).unwrap();
    let dir = PathBuf::from("/repo").join(&manifest.name);
    Project::new(dir, manifest, false)
}

/// Project whose `dependencies` are `deps`.
pub fn project(name: &str, deps: &[&str]) -> Project {
    let dependencies: serde_json::Map<String, Value> = deps
        .iter()
        .map(|d| (d.to_string(), json!("workspace:*")))
        .collect();
    project_from(json!({
        "name": name,
        "version": "1.0.0",
        "dependencies": dependencies,
    }))
}

pub fn workspace(projects: Vec<Project>) -> Workspace {
    Workspace::new("/repo", projects).unwrap()
}
