//! Output formatters for tgdeps reports.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::OutputFormat;
use anyhow::Result;
use std::path::Path;
use tgdeps_core::{DependencyGraph, DependencyReport, ProjectMetrics, UnusedModulesReport};

/// Renders each report kind to a string ready for stdout.
pub trait Formatter {
    fn dependency_report(&self, report: &DependencyReport) -> Result<String>;

    fn unused_report(&self, report: &UnusedModulesReport) -> Result<String>;

    /// Cycles as closed walks (first identity repeated at the end).
    fn cycles(&self, cycles: &[Vec<String>]) -> Result<String>;

    fn graph(&self, graph: &DependencyGraph) -> Result<String>;

    fn metrics(&self, metrics: &ProjectMetrics) -> Result<String>;
}

/// Formatter for `format`; human output shortens paths relative to `root`.
pub fn formatter_for(format: OutputFormat, root: &Path) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter::new(root)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
