//! Summaries derived from a built graph, shaped for the reporting layer.

use crate::resolver;
use crate::types::{DependencyEdge, DependencyGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One line per module in a dependency report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub path: String,
    pub name: String,
    /// Direct dependencies that resolved to a known module.
    pub dependencies: usize,
    pub dependents: usize,
    /// Declared paths not reflected in a direct edge (unmatched or repeated).
    pub unresolved: usize,
}

/// Answer to "what depends on what".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub modules: Vec<ModuleSummary>,
    pub direct_dependencies: Vec<DependencyEdge>,
    pub transitive_dependencies: usize,
    pub circular_dependencies: Vec<Vec<String>>,
}

impl DependencyReport {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let modules = graph
            .modules
            .values()
            .map(|module| {
                let identity = module.identity();
                let dependencies = graph.dependencies_of(identity).count();
                ModuleSummary {
                    path: identity.to_string(),
                    name: module.record.name().to_string(),
                    dependencies,
                    dependents: module.dependents.len(),
                    unresolved: module
                        .record
                        .dependency_paths
                        .len()
                        .saturating_sub(dependencies),
                }
            })
            .collect();

        Self {
            modules,
            direct_dependencies: graph.direct_edges().cloned().collect(),
            transitive_dependencies: graph.transitive_edges().count(),
            circular_dependencies: graph.cycles.clone(),
        }
    }
}

/// A module flagged as a cleanup candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedModule {
    pub path: String,
    pub reason: String,
}

/// A suggested follow-up action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub description: String,
}

/// Answer to "what could be removed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedModulesReport {
    pub orphaned: Vec<UnusedModule>,
    pub isolated: Vec<UnusedModule>,
    pub potential_cleanup: usize,
    pub recommendations: Vec<Recommendation>,
}

impl UnusedModulesReport {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let orphaned: Vec<UnusedModule> = graph
            .orphaned
            .iter()
            .map(|path| UnusedModule {
                path: path.clone(),
                reason: "No other module depends on it".to_string(),
            })
            .collect();

        let isolated: Vec<UnusedModule> = graph
            .isolated
            .iter()
            .map(|path| UnusedModule {
                path: path.clone(),
                reason: "Isolated module with no dependencies or dependents".to_string(),
            })
            .collect();

        let recommendations = recommendations(orphaned.len(), isolated.len());

        Self {
            potential_cleanup: orphaned.len() + isolated.len(),
            orphaned,
            isolated,
            recommendations,
        }
    }
}

fn recommendations(orphaned: usize, isolated: usize) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if orphaned > 0 {
        out.push(Recommendation {
            action: "Review orphaned modules".to_string(),
            description: format!("{} modules are not used by any other module", orphaned),
        });
    }

    if isolated > 0 {
        out.push(Recommendation {
            action: "Check isolated modules".to_string(),
            description: format!("{} modules have neither dependencies nor dependents", isolated),
        });
    }

    if out.is_empty() {
        out.push(Recommendation {
            action: "Keep current structure".to_string(),
            description: "Every module is referenced by another module".to_string(),
        });
    }

    out
}

/// Size of the configuration files a graph was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub files: usize,
    pub lines: usize,
    pub bytes: u64,
    /// Discovered files that could not be read.
    pub unreadable: usize,
}

impl SourceStats {
    /// Counts one file with the given contents.
    pub fn add(&mut self, contents: &str) {
        self.files += 1;
        self.lines += contents.lines().count();
        self.bytes += contents.len() as u64;
    }
}

/// Shape and size of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub modules: usize,
    /// Directories between the root and any module, module directories included.
    pub directories: usize,
    /// Deepest module directory below the root; a module at the root is 0.
    pub max_depth: usize,
    pub lines_of_code: usize,
    pub total_bytes: u64,
    pub direct_dependencies: usize,
    pub transitive_dependencies: usize,
    /// Modules that pull a Terraform source.
    pub sourced_modules: usize,
    pub circular_dependencies: usize,
    pub orphaned: usize,
    pub isolated: usize,
}

impl ProjectMetrics {
    /// Metrics for `graph`, with depth measured from `root`. Identities
    /// outside `root` are measured from the filesystem root.
    pub fn from_graph(graph: &DependencyGraph, root: &str) -> Self {
        let root = root.trim_end_matches('/');
        let mut directories = BTreeSet::new();
        let mut max_depth = 0;

        for identity in graph.modules.keys() {
            let relative = identity
                .strip_prefix(root)
                .filter(|rest| rest.starts_with('/'))
                .unwrap_or(identity);
            let segments: Vec<&str> = resolver::parent_dir(relative)
                .split('/')
                .filter(|segment| !segment.is_empty() && *segment != ".")
                .collect();

            max_depth = max_depth.max(segments.len());
            for depth in 1..=segments.len() {
                directories.insert(segments[..depth].join("/"));
            }
        }

        Self {
            modules: graph.modules.len(),
            directories: directories.len(),
            max_depth,
            lines_of_code: 0,
            total_bytes: 0,
            direct_dependencies: graph.direct_edges().count(),
            transitive_dependencies: graph.transitive_edges().count(),
            sourced_modules: graph
                .modules
                .values()
                .filter(|module| module.record.source.is_some())
                .count(),
            circular_dependencies: graph.cycles.len(),
            orphaned: graph.orphaned.len(),
            isolated: graph.isolated.len(),
        }
    }

    pub fn with_source_stats(mut self, stats: &SourceStats) -> Self {
        self.lines_of_code = stats.lines;
        self.total_bytes = stats.bytes;
        self
    }
}
