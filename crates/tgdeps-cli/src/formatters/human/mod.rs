//! Human-readable formatter for reports.

mod cycles;
mod graph;


use super::Formatter;
use anyhow::Result;
use colored::Colorize;
use std::fmt::{self, Write};
use std::path::Path;
use tgdeps_core::{DependencyGraph, DependencyReport, ProjectMetrics, UnusedModulesReport};

/// Prints reports for a terminal, with paths shown relative to the
/// project root.
pub struct HumanFormatter {
    root: String,
}

impl HumanFormatter {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_string_lossy().trim_end_matches('/').to_string(),
        }
    }

    /// Identity shown relative to the project root.
    pub(crate) fn short<'a>(&self, identity: &'a str) -> &'a str {
        match identity.strip_prefix(self.root.as_str()) {
            Some(rest) if rest.len() > 1 && rest.starts_with('/') => &rest[1..],
            _ => identity,
        }
    }

    fn write_dependency_report(&self, out: &mut String, report: &DependencyReport) -> fmt::Result {
        header(out, "Terragrunt Dependency Report")?;

        writeln!(out, "Statistics:")?;
        writeln!(out, "  Total modules: {}", report.modules.len())?;
        writeln!(out, "  Direct dependencies: {}", report.direct_dependencies.len())?;
        writeln!(out, "  Transitive dependencies: {}", report.transitive_dependencies)?;
        writeln!(out, "  Circular dependencies: {}", report.circular_dependencies.len())?;

        if !report.modules.is_empty() {
            writeln!(out, "\n📦 Modules ({}):", report.modules.len())?;
            for module in &report.modules {
                write!(
                    out,
                    "  {} {} - {} dependencies, {} dependents",
                    module.name.bold(),
                    format!("({})", self.short(&module.path)).dimmed(),
                    module.dependencies,
                    module.dependents
                )?;
                if module.unresolved > 0 {
                    write!(out, ", {}", format!("{} unresolved", module.unresolved).yellow())?;
                }
                writeln!(out)?;
            }
        }

        if !report.direct_dependencies.is_empty() {
            writeln!(out, "\n🔗 Direct Dependencies ({}):", report.direct_dependencies.len())?;
            for edge in &report.direct_dependencies {
                writeln!(out, "  {} → {}", self.short(&edge.from), self.short(&edge.to))?;
            }
        }

        if !report.circular_dependencies.is_empty() {
            cycles::write_cycles(out, &report.circular_dependencies, |id| self.short(id))?;
        }

        Ok(())
    }

    fn write_unused_report(&self, out: &mut String, report: &UnusedModulesReport) -> fmt::Result {
        header(out, "Unused Modules Report")?;

        writeln!(out, "Statistics:")?;
        writeln!(out, "  Orphaned modules: {}", report.orphaned.len())?;
        writeln!(out, "  Isolated modules: {}", report.isolated.len())?;
        writeln!(out, "  Cleanup candidates: {}", report.potential_cleanup)?;

        if !report.orphaned.is_empty() {
            writeln!(out, "\n🔍 Orphaned Modules ({}):", report.orphaned.len())?;
            for module in &report.orphaned {
                writeln!(out, "  {} - {}", self.short(&module.path), module.reason.dimmed())?;
            }
        }

        if !report.isolated.is_empty() {
            writeln!(out, "\n🏝️  Isolated Modules ({}):", report.isolated.len())?;
            for module in &report.isolated {
                writeln!(out, "  {} - {}", self.short(&module.path).yellow(), module.reason.dimmed())?;
            }
        }

        writeln!(out, "\n💡 Recommendations:")?;
        for recommendation in &report.recommendations {
            writeln!(
                out,
                "  • {}: {}",
                recommendation.action.bold(),
                recommendation.description
            )?;
        }

        Ok(())
    }
}

impl Formatter for HumanFormatter {
    fn dependency_report(&self, report: &DependencyReport) -> Result<String> {
        let mut out = String::new();
        self.write_dependency_report(&mut out, report)?;
        Ok(out)
    }

    fn unused_report(&self, report: &UnusedModulesReport) -> Result<String> {
        let mut out = String::new();
        self.write_unused_report(&mut out, report)?;
        Ok(out)
    }

    fn cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        let mut out = String::new();
        if cycles.is_empty() {
            writeln!(out, "{} No circular dependencies found", "✓".green())?;
        } else {
            cycles::write_cycles(&mut out, cycles, |id| self.short(id))?;
        }
        Ok(out)
    }

    fn graph(&self, graph: &DependencyGraph) -> Result<String> {
        let mut out = String::new();
        graph::write_graph(&mut out, graph, |id| self.short(id))?;
        Ok(out)
    }

    fn metrics(&self, metrics: &ProjectMetrics) -> Result<String> {
        let mut out = String::new();
        write_metrics(&mut out, metrics)?;
        Ok(out)
    }
}

fn write_metrics(out: &mut String, metrics: &ProjectMetrics) -> fmt::Result {
    header(out, "Project Metrics")?;

    writeln!(out, "📁 Structure:")?;
    writeln!(out, "  Modules: {}", metrics.modules)?;
    writeln!(out, "  Directories: {}", metrics.directories)?;
    writeln!(out, "  Max depth: {}", metrics.max_depth)?;
    writeln!(out, "  Lines of code: {}", metrics.lines_of_code)?;
    writeln!(out, "  Total size: {} KB", (metrics.total_bytes + 512) / 1024)?;

    writeln!(out, "\n🔗 Dependencies:")?;
    writeln!(out, "  Direct: {}", metrics.direct_dependencies)?;
    writeln!(out, "  Transitive: {}", metrics.transitive_dependencies)?;
    writeln!(out, "  Modules with a Terraform source: {}", metrics.sourced_modules)?;

    writeln!(out, "\n🩺 Health:")?;
    let cycles = format!("Circular dependencies: {}", metrics.circular_dependencies);
    if metrics.circular_dependencies > 0 {
        writeln!(out, "  {}", cycles.red())?;
    } else {
        writeln!(out, "  {}", cycles)?;
    }
    writeln!(out, "  Orphaned modules: {}", metrics.orphaned)?;
    writeln!(out, "  Isolated modules: {}", metrics.isolated)
}

pub(crate) fn header(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{}", title.bold())?;
    writeln!(out, "{}\n", "=".repeat(title.chars().count()))
}
