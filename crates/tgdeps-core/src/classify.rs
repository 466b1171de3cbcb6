//! Orphaned and isolated module classification.

use crate::types::{Classification, DependencyGraph};
use std::collections::HashSet;

/// Labels modules by their direct-edge connectivity.
///
/// Orphaned modules have no incoming direct edge. Isolated modules have no
/// direct edge at all, which makes every isolated module orphaned as well.
/// Both lists follow identity order.
pub fn classify(graph: &DependencyGraph) -> Classification {
    Classification {
        orphaned: find_orphaned(graph),
        isolated: find_isolated(graph),
    }
}

/// Modules nothing directly depends on.
pub fn find_orphaned(graph: &DependencyGraph) -> Vec<String> {
    let has_dependents: HashSet<&str> = graph
        .direct_edges()
        .map(|edge| edge.to.as_str())
        .collect();

    graph
        .modules
        .keys()
        .filter(|identity| !has_dependents.contains(identity.as_str()))
        .cloned()
        .collect()
}

/// Modules with neither dependencies nor dependents.
pub fn find_isolated(graph: &DependencyGraph) -> Vec<String> {
    let connected: HashSet<&str> = graph
        .direct_edges()
        .flat_map(|edge| [edge.from.as_str(), edge.to.as_str()])
        .collect();

    graph
        .modules
        .keys()
        .filter(|identity| !connected.contains(identity.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DependencyEdge, Module, ModuleRecord};

    fn graph_with(modules: &[&str], edges: Vec<DependencyEdge>) -> DependencyGraph {
        DependencyGraph {
            modules: modules
                .iter()
                .map(|id| (id.to_string(), Module::new(ModuleRecord::new(*id))))
                .collect(),
            edges,
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_classification() {
        let graph = graph_with(
            &["X", "Y", "Z"],
            vec![DependencyEdge::direct("X", "Y"), DependencyEdge::direct("Y", "Z")],
        );

        let result = classify(&graph);

        assert_eq!(result.orphaned, vec!["X"]);
        assert!(result.isolated.is_empty());
    }

    #[test]
    fn test_isolated_module() {
        let graph = graph_with(&["A", "B", "L"], vec![DependencyEdge::direct("A", "B")]);

        let result = classify(&graph);

        assert_eq!(result.orphaned, vec!["A", "L"]);
        assert_eq!(result.isolated, vec!["L"]);
    }

    #[test]
    fn test_transitive_edges_do_not_count() {
        let graph = graph_with(
            &["A", "B"],
            vec![DependencyEdge::transitive("A", "B")],
        );

        let result = classify(&graph);

        assert_eq!(result.orphaned, vec!["A", "B"]);
        assert_eq!(result.isolated, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_graph() {
        let result = classify(&DependencyGraph::default());
        assert_eq!(result, Classification::default());
    }
}
