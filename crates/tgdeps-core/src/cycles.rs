//! Circular dependency detection over direct edges.
//!
//! Depth-first search from every unvisited module, keeping the current walk
//! and the set of modules on it. An edge back into the walk closes a cycle.
//! Time complexity: O(V + E) where V = modules, E = direct edges
//! Space complexity: O(V)
//!
//! The search is iterative so deep dependency chains cannot overflow the
//! call stack, and all traversal state lives inside a single call.

use crate::types::DependencyGraph;
use std::collections::{HashMap, HashSet};

/// Finds cycles in a graph's direct-edge subgraph.
#[derive(Debug)]
pub struct CycleDetector<'a> {
    nodes: Vec<&'a str>,
    adjacency: HashMap<&'a str, Vec<&'a str>>,
    dedupe: bool,
}

impl<'a> CycleDetector<'a> {
    /// Creates a detector over the direct edges of `graph`.
    ///
    /// Roots are tried in identity order, neighbors in declaration order,
    /// so results are stable across runs.
    pub fn new(graph: &'a DependencyGraph) -> Self {
        let mut adjacency: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for edge in graph.direct_edges() {
            adjacency
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }

        Self {
            nodes: graph.modules.keys().map(String::as_str).collect(),
            adjacency,
            dedupe: true,
        }
    }

    /// Whether to collapse cycles that are rotations of one another.
    ///
    /// On by default. Deduplicated cycles are rotated so that the smallest
    /// identity comes first.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Runs the search.
    ///
    /// # Returns
    /// Closed walks, each starting and ending with the same identity.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut visited: HashSet<&str> = HashSet::new();

        for &root in &self.nodes {
            if visited.contains(root) {
                continue;
            }

            // (node, index of the next neighbor to try)
            let mut frames: Vec<(&str, usize)> = vec![(root, 0)];
            let mut path: Vec<&str> = vec![root];
            let mut on_path: HashSet<&str> = HashSet::from([root]);
            visited.insert(root);

            while let Some(frame) = frames.last_mut() {
                let (node, next) = *frame;
                let neighbor = self
                    .adjacency
                    .get(node)
                    .and_then(|neighbors| neighbors.get(next))
                    .copied();

                let Some(neighbor) = neighbor else {
                    frames.pop();
                    path.pop();
                    on_path.remove(node);
                    continue;
                };
                frame.1 += 1;

                if !visited.contains(neighbor) {
                    visited.insert(neighbor);
                    on_path.insert(neighbor);
                    path.push(neighbor);
                    frames.push((neighbor, 0));
                } else if on_path.contains(neighbor) {
                    let cycle = close_cycle(&path, neighbor);
                    self.record(cycle, &mut cycles, &mut seen);
                }
            }
        }

        cycles
    }

    fn record(
        &self,
        cycle: Vec<String>,
        cycles: &mut Vec<Vec<String>>,
        seen: &mut HashSet<Vec<String>>,
    ) {
        if !self.dedupe {
            cycles.push(cycle);
            return;
        }

        let canonical = canonicalize(&cycle);
        if seen.insert(canonical.clone()) {
            cycles.push(canonical);
        }
    }
}

/// Convenience wrapper using the default policy.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    CycleDetector::new(graph).find_cycles()
}

fn close_cycle(path: &[&str], neighbor: &str) -> Vec<String> {
    let start = path
        .iter()
        .position(|&node| node == neighbor)
        .unwrap_or(0);
    path[start..]
        .iter()
        .chain(std::iter::once(&neighbor))
        .map(|node| node.to_string())
        .collect()
}

/// Rotates a closed walk so its smallest identity comes first.
fn canonicalize(cycle: &[String]) -> Vec<String> {
    let open = &cycle[..cycle.len().saturating_sub(1)];
    let Some(min_idx) = open
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(idx, _)| idx)
    else {
        return cycle.to_vec();
    };

    let mut rotated: Vec<String> = open[min_idx..]
        .iter()
        .chain(open[..min_idx].iter())
        .cloned()
        .collect();
    rotated.push(rotated[0].clone());
    rotated
}
