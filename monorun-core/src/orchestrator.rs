//! Dependency-ordered startup of every project in a workspace.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::graph::DependencyGraph;
use crate::project::Project;
use crate::runner::{CommandExecutor, LaunchHandle};
use crate::workspace::Workspace;

/// Progress of one project within an orchestrator run.
///
/// Projects without an entry have not been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    /// Dependencies are being started; the project itself is not launched yet.
    Starting,
    /// The start command has been issued.
    Started,
}

/// Starts projects after their in-workspace dependencies, each at most once.
///
/// The traversal is depth-first in registry order. A project is marked
/// [`StartState::Starting`] before its dependencies are visited, so a
/// dependency cycle is entered once and each of its members is started once.
/// Launched commands are not awaited.
pub struct Orchestrator<'a> {
    workspace: &'a Workspace,
    graph: DependencyGraph,
    start_command: String,
    states: FxHashMap<String, StartState>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(workspace: &'a Workspace, start_command: impl Into<String>) -> Self {
        Self {
            workspace,
            graph: DependencyGraph::new(workspace),
            start_command: start_command.into(),
            states: FxHashMap::default(),
        }
    }

    pub fn state(&self, name: &str) -> Option<StartState> {
        self.states.get(name).copied()
    }

    /// Launches the start command of every project not started yet.
    ///
    /// Returns one handle per launched command, in launch order.
    pub fn start_all(&mut self, executor: &dyn CommandExecutor) -> Vec<LaunchHandle> {
        let command = self.start_command.clone();
        let mut handles = Vec::new();
        self.traverse(&mut |project| {
            info!(project = %project.name, command = %command, "starting project");
            handles.push(executor.launch(&command, &project.dir));
        });
        handles
    }

    /// Names of the projects not started yet, in the order `start_all` would
    /// launch them. Marks them started.
    pub fn plan(&mut self) -> Vec<String> {
        let mut order = Vec::new();
        self.traverse(&mut |project| order.push(project.name.clone()));
        order
    }

    fn traverse(&mut self, on_start: &mut dyn FnMut(&'a Project)) {
        for position in 0..self.workspace.len() {
            self.visit(position, on_start);
        }
    }

    fn visit(&mut self, position: usize, on_start: &mut dyn FnMut(&'a Project)) {
        let workspace = self.workspace;
        let project = &workspace.projects()[position];

        if let Some(state) = self.states.get(&project.name) {
            if *state == StartState::Starting {
                debug!(project = %project.name, "dependency cycle, already starting");
            }
            return;
        }
        self.states.insert(project.name.clone(), StartState::Starting);

        for dependency in self.graph.dependencies_of(position) {
            self.visit(dependency, on_start);
        }

        on_start(project);
        self.states.insert(project.name.clone(), StartState::Started);
    }
}
