//! Transitive dependency inference.
//!
//! For every module with direct dependencies, walks the direct-edge graph
//! from its direct targets and emits one transitive edge per module reached
//! that is neither a direct target nor the module itself.
//!
//! Time complexity: O(V * (V + E)) worst case. Module trees are small enough
//! that a per-source walk beats anything cleverer.

use crate::types::{DependencyEdge, EdgeKind};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Computes the transitive edges implied by the direct edges in `edges`.
///
/// Non-direct entries of `edges` are ignored, so running this over a graph
/// that already holds its transitive edges yields the same set again.
/// Output is sorted by source, then target.
pub fn expand(edges: &[DependencyEdge]) -> Vec<DependencyEdge> {
    let adjacency = direct_adjacency(edges);
    let mut inferred = Vec::new();

    for (&from, direct_targets) in &adjacency {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut reached: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<&str> = direct_targets.iter().copied().collect();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            if !direct_targets.contains(current) && current != from {
                reached.insert(current);
            }

            if let Some(next) = adjacency.get(current) {
                stack.extend(next.iter().copied().filter(|n| !visited.contains(n)));
            }
        }

        inferred.extend(
            reached
                .into_iter()
                .map(|target| DependencyEdge::transitive(from, target)),
        );
    }

    inferred
}

fn direct_adjacency(edges: &[DependencyEdge]) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for edge in edges.iter().filter(|e| e.kind == EdgeKind::Direct) {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .insert(edge.to.as_str());
    }
    adjacency
}
