//! Dependency graph construction.
//!
//! The builder indexes module records by identity, resolves every declared
//! dependency path against the module table, and then layers transitive
//! edges, cycles and classification on top of the direct edges.

use crate::classify::classify;
use crate::cycles::CycleDetector;
use crate::error::Result;
use crate::resolver::{self, ResolvedPath};
use crate::transitive;
use crate::types::{DependencyEdge, DependencyGraph, Module, ModuleRecord};
use crate::validation::validate_identity;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Per-directory configuration file Terragrunt looks for.
pub const DEFAULT_CONFIG_FILENAME: &str = "terragrunt.hcl";

/// Builds a [`DependencyGraph`] from module records.
///
/// # Example
///
/// ```
/// use tgdeps_core::{GraphBuilder, ModuleRecord};
///
/// let records = vec![
///     ModuleRecord::new("/live/app/terragrunt.hcl").with_dependency("../vpc"),
///     ModuleRecord::new("/live/vpc/terragrunt.hcl"),
/// ];
///
/// let graph = GraphBuilder::new().build(records)?;
/// assert_eq!(graph.direct_edges().count(), 1);
/// assert_eq!(graph.orphaned, vec!["/live/app/terragrunt.hcl"]);
/// # Ok::<(), tgdeps_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config_filename: String,
    dedupe_cycles: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            config_filename: DEFAULT_CONFIG_FILENAME.to_string(),
            dedupe_cycles: true,
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name used to match a dependency that points at a directory.
    pub fn config_filename(mut self, name: impl Into<String>) -> Self {
        self.config_filename = name.into();
        self
    }

    /// Collapse cycles that are rotations of one another (default: true).
    pub fn dedupe_cycles(mut self, dedupe: bool) -> Self {
        self.dedupe_cycles = dedupe;
        self
    }

    /// Builds the graph.
    ///
    /// Records sharing an identity overwrite each other; the last one wins.
    /// Dependency paths that match no module are dropped.
    ///
    /// # Errors
    /// - `Error::InvalidIdentity` if any record's identity is not a file path
    pub fn build<I>(&self, records: I) -> Result<DependencyGraph>
    where
        I: IntoIterator<Item = ModuleRecord>,
    {
        let (mut modules, order) = index_records(records)?;
        let edges = self.link_direct(&mut modules, &order);

        let mut graph = DependencyGraph {
            modules,
            edges,
            ..Default::default()
        };

        let inferred = transitive::expand(&graph.edges);
        graph.edges.extend(inferred);

        graph.cycles = CycleDetector::new(&graph)
            .with_dedupe(self.dedupe_cycles)
            .find_cycles();

        let classification = classify(&graph);
        graph.orphaned = classification.orphaned;
        graph.isolated = classification.isolated;

        info!(
            modules = graph.modules.len(),
            direct = graph.direct_edges().count(),
            transitive = graph.transitive_edges().count(),
            cycles = graph.cycles.len(),
            "built dependency graph"
        );

        Ok(graph)
    }

    /// Resolves declared paths into direct edges, recording each source in
    /// its target's `dependents`.
    fn link_direct(
        &self,
        modules: &mut BTreeMap<String, Module>,
        order: &[String],
    ) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();
        let mut linked: HashSet<(String, String)> = HashSet::new();

        for identity in order {
            let declared = match modules.get(identity) {
                Some(module) => module.record.dependency_paths.clone(),
                None => continue,
            };

            for raw in &declared {
                let resolved = resolver::resolve(raw, identity);
                let Some(target) = self.find_module(modules, &resolved) else {
                    debug!(from = %identity, path = %raw, resolved = %resolved, "dropping unresolved dependency");
                    continue;
                };

                if !linked.insert((identity.clone(), target.clone())) {
                    continue;
                }

                if let Some(module) = modules.get_mut(&target) {
                    module.dependents.push(identity.clone());
                }
                edges.push(DependencyEdge::direct(identity.clone(), target));
            }
        }

        edges
    }

    /// Three-tier lookup: exact identity, then the directory's config file,
    /// then any module living in the target directory.
    fn find_module(
        &self,
        modules: &BTreeMap<String, Module>,
        resolved: &ResolvedPath,
    ) -> Option<String> {
        let target = resolved.as_str();

        if modules.contains_key(target) {
            return Some(target.to_string());
        }

        let config_path = resolver::join(target, &self.config_filename);
        if modules.contains_key(&config_path) {
            return Some(config_path);
        }

        let target_dir = if self.names_config_file(target) {
            resolver::parent_dir(target)
        } else {
            target
        };

        modules
            .keys()
            .find(|identity| resolver::parent_dir(identity) == target_dir)
            .cloned()
    }

    fn names_config_file(&self, path: &str) -> bool {
        path.rsplit('/').next() == Some(self.config_filename.as_str())
    }
}

/// Builds a graph with the default builder settings.
pub fn build_graph<I>(records: I) -> Result<DependencyGraph>
where
    I: IntoIterator<Item = ModuleRecord>,
{
    GraphBuilder::new().build(records)
}

/// Validates and indexes records. Returns the table and the order in which
/// identities were first seen.
fn index_records<I>(records: I) -> Result<(BTreeMap<String, Module>, Vec<String>)>
where
    I: IntoIterator<Item = ModuleRecord>,
{
    let mut modules = BTreeMap::new();
    let mut order = Vec::new();

    for record in records {
        validate_identity(&record.identity)?;

        let identity = record.identity.clone();
        if modules.insert(identity.clone(), Module::new(record)).is_some() {
            warn!(identity = %identity, "duplicate module identity, keeping the last record");
        } else {
            order.push(identity);
        }
    }

    Ok((modules, order))
}
