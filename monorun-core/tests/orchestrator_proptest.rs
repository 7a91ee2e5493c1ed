mod common;

use std::collections::HashMap;

use common::{project, workspace, RecordingExecutor};
use monorun_core::graph::DependencyGraph;
use monorun_core::orchestrator::Orchestrator;
use proptest::prelude::*;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn gen_edges() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=NAMES.len()).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n + 2), 0..12);
        (Just(n), edges)
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> monorun_core::workspace::Workspace {
    let projects = (0..n)
        .map(|i| {
            // Targets past `n` are packages from outside the workspace.
            let deps: Vec<String> = edges
                .iter()
                .filter(|(from, _)| *from == i)
                .map(|(_, to)| {
                    if *to < n {
                        NAMES[*to].to_string()
                    } else {
                        format!("external-{}", to)
                    }
                })
                .collect();
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            project(NAMES[i], &deps)
        })
        .collect();
    workspace(projects)
}

proptest! {
    #[test]
    fn test_every_project_starts_exactly_once((n, edges) in gen_edges()) {
        let ws = build(n, &edges);
        let executor = RecordingExecutor::new();

        Orchestrator::new(&ws, "pnpm run start").start_all(&executor);

        let launched = executor.launched();
        prop_assert_eq!(launched.len(), n);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &launched {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        prop_assert!(counts.values().all(|&c| c == 1));
    }

    #[test]
    fn test_acyclic_dependencies_start_first((n, edges) in gen_edges()) {
        // Edges only point to later projects, so the graph is acyclic.
        let edges: Vec<(usize, usize)> = edges.into_iter().filter(|(from, to)| to > from).collect();
        let ws = build(n, &edges);
        let graph = DependencyGraph::new(&ws);
        prop_assert!(graph.cycles().is_empty());

        let executor = RecordingExecutor::new();
        Orchestrator::new(&ws, "pnpm run start").start_all(&executor);

        let launched = executor.launched();
        let at = |name: &str| launched.iter().position(|l| l == name).unwrap();
        for position in 0..n {
            for dependency in graph.dependencies_of(position) {
                prop_assert!(at(NAMES[dependency]) < at(NAMES[position]));
            }
        }
    }
}
