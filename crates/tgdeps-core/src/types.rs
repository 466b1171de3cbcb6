//! Core data types for tgdeps analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::resolver;

/// A literal value supplied to a module through its `inputs` block.
///
/// The graph algorithms never look inside these; they are carried so
/// reports can show what each module was configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<InputValue>),
    Map(BTreeMap<String, InputValue>),
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::String(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::String(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

/// One discovered configuration unit, as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Canonical path of the configuration file. Unique within a graph.
    pub identity: String,

    /// `terraform { source = ... }`, opaque to the graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Raw dependency paths in declaration order.
    #[serde(default)]
    pub dependency_paths: Vec<String>,

    /// Literal inputs supplied to the module.
    #[serde(default)]
    pub inputs: BTreeMap<String, InputValue>,

    /// `terragrunt_version_constraint`, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,
}

impl ModuleRecord {
    /// Creates a record with no source, dependencies or inputs.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            source: None,
            dependency_paths: Vec::new(),
            inputs: BTreeMap::new(),
            version_constraint: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_dependency(mut self, path: impl Into<String>) -> Self {
        self.dependency_paths.push(path.into());
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn with_version_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = Some(constraint.into());
        self
    }

    /// Unit name: the basename of the directory holding the config file.
    pub fn name(&self) -> &str {
        let dir = resolver::parent_dir(&self.identity);
        dir.rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(dir)
    }
}

/// A module as held by a built graph: the record plus the modules that
/// directly depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(flatten)]
    pub record: ModuleRecord,

    /// Identities of modules with a direct edge into this one.
    #[serde(default)]
    pub dependents: Vec<String>,
}

impl Module {
    pub fn new(record: ModuleRecord) -> Self {
        Self {
            record,
            dependents: Vec::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.record.identity
    }
}

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Explicitly declared and resolved to a known module.
    Direct,
    /// Inferred through two or more direct hops.
    Transitive,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Direct => f.write_str("direct"),
            EdgeKind::Transitive => f.write_str("transitive"),
        }
    }
}

/// Directed relation `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl DependencyEdge {
    pub fn direct(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Direct,
        }
    }

    pub fn transitive(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Transitive,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind == EdgeKind::Direct
    }
}

/// The result of one analysis run.
///
/// `edges` behaves as a set: no two entries share `(from, to, kind)`, and
/// every endpoint is a key of `modules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub modules: BTreeMap<String, Module>,
    pub edges: Vec<DependencyEdge>,
    /// Closed walks through direct edges; first and last entries are equal.
    pub cycles: Vec<Vec<String>>,
    pub orphaned: Vec<String>,
    pub isolated: Vec<String>,
}

impl DependencyGraph {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module(&self, identity: &str) -> Option<&Module> {
        self.modules.get(identity)
    }

    pub fn direct_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(|edge| edge.kind == EdgeKind::Direct)
    }

    pub fn transitive_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::Transitive)
    }

    /// Direct dependencies of `identity`, in the order they were declared.
    pub fn dependencies_of<'a>(&'a self, identity: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.direct_edges()
            .filter(move |edge| edge.from == identity)
            .map(|edge| edge.to.as_str())
    }

    /// Modules with a direct edge into `identity`.
    pub fn dependents_of(&self, identity: &str) -> &[String] {
        self.modules
            .get(identity)
            .map(|module| module.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Output of the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// No incoming direct edge.
    pub orphaned: Vec<String>,
    /// No direct edge in either direction.
    pub isolated: Vec<String>,
}
