//! tgdeps core - dependency graph construction and analysis for Terragrunt
//! module trees.
//!
//! This crate owns everything that is not I/O:
//!
//! - [`resolver`]: lexical resolution of declared dependency paths
//! - [`GraphBuilder`]: module table, direct edges, orchestration
//! - [`transitive`]: inferred multi-hop edges
//! - [`CycleDetector`]: cycles over direct edges
//! - [`classify`]: orphaned and isolated modules
//! - [`report`]: summaries and project metrics for the reporting layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   tgdeps-cli    │  (User interface)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   tgdeps-hcl    │  (Discovery + record extraction)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   tgdeps-core   │  (This crate - graph engine)
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tgdeps_core::{build_graph, ModuleRecord};
//!
//! let graph = build_graph(vec![
//!     ModuleRecord::new("/live/x/terragrunt.hcl").with_dependency("../y"),
//!     ModuleRecord::new("/live/y/terragrunt.hcl").with_dependency("../z"),
//!     ModuleRecord::new("/live/z/terragrunt.hcl"),
//! ])?;
//!
//! assert_eq!(graph.transitive_edges().count(), 1);
//! assert!(graph.cycles.is_empty());
//! # Ok::<(), tgdeps_core::Error>(())
//! ```

pub mod classify;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod report;
pub mod resolver;
pub mod transitive;
pub mod types;
pub mod validation;

// Re-export core types for convenience
pub use classify::classify;
pub use cycles::{detect_cycles, CycleDetector};
pub use error::{Error, Result};
pub use graph::{build_graph, GraphBuilder, DEFAULT_CONFIG_FILENAME};
pub use report::{
    DependencyReport, ModuleSummary, ProjectMetrics, Recommendation, SourceStats, UnusedModule,
    UnusedModulesReport,
};
pub use resolver::{resolve, ResolvedPath};
pub use types::{
    Classification, DependencyEdge, DependencyGraph, EdgeKind, InputValue, Module, ModuleRecord,
};
