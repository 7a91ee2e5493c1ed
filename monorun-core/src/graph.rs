//! Dependency edges between projects of a workspace, using petgraph.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::workspace::Workspace;

/// Directed graph of in-workspace dependencies.
///
/// Node `i` is the project at position `i` of the workspace. An edge A -> B
/// exists when A declares B (dependencies, devDependencies or
/// peerDependencies) and B is part of the workspace. Cycles are allowed.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
}

impl DependencyGraph {
    pub fn new(workspace: &Workspace) -> Self {
        let mut graph = DiGraph::with_capacity(workspace.len(), workspace.len());
        for project in workspace.projects() {
            graph.add_node(project.name.clone());
        }

        for (from, project) in workspace.projects().iter().enumerate() {
            for dep_name in project.manifest.dependency_names() {
                if let Some(to) = workspace.position(dep_name) {
                    graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
                }
            }
        }

        Self { graph }
    }

    /// Positions of the direct in-workspace dependencies of the project at
    /// `position`, in declaration order.
    pub fn dependencies_of(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Outgoing)
    }

    /// Positions of the projects that directly depend on the project at
    /// `position`, in workspace order of their declarations.
    pub fn dependents_of(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Incoming)
    }

    fn neighbors(&self, position: usize, direction: Direction) -> Vec<usize> {
        let node = NodeIndex::new(position);
        if self.graph.node_weight(node).is_none() {
            return Vec::new();
        }

        // petgraph walks edges newest first; edge ids follow insertion order.
        let mut edges: Vec<_> = self.graph.edges_directed(node, direction).collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| match direction {
                Direction::Outgoing => e.target().index(),
                Direction::Incoming => e.source().index(),
            })
            .collect()
    }

    /// Names of the direct in-workspace dependencies of `position`.
    pub fn dependency_names(&self, position: usize) -> Vec<&str> {
        self.dependencies_of(position)
            .into_iter()
            .map(|i| self.graph[NodeIndex::new(i)].as_str())
            .collect()
    }

    /// Groups of projects that depend on each other in a cycle.
    ///
    /// Self-dependencies count as a cycle of one.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
