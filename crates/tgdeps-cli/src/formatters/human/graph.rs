//! Full graph formatter.

use super::header;
use colored::Colorize;
use std::fmt::{self, Write};
use tgdeps_core::{DependencyGraph, EdgeKind};

pub fn write_graph<'a, F>(out: &mut String, graph: &'a DependencyGraph, short: F) -> fmt::Result
where
    F: Fn(&'a str) -> &'a str,
{
    header(out, "Dependency Graph")?;

    if graph.is_empty() {
        writeln!(out, "No modules found.")?;
        return Ok(());
    }

    for module in graph.modules.values() {
        let identity = module.identity();
        writeln!(out, "{} {}", module.record.name().bold(), format!("({})", short(identity)).dimmed())?;

        if let Some(source) = &module.record.source {
            writeln!(out, "    source: {}", source)?;
        }
        if let Some(constraint) = &module.record.version_constraint {
            writeln!(out, "    terragrunt: {}", constraint)?;
        }

        let list = |kind: EdgeKind| {
            graph
                .edges
                .iter()
                .filter(|edge| edge.from == identity && edge.kind == kind)
                .map(|edge| short(edge.to.as_str()))
                .collect::<Vec<_>>()
        };

        let direct = list(EdgeKind::Direct);
        if !direct.is_empty() {
            writeln!(out, "    depends on: {}", direct.join(", "))?;
        }

        let transitive = list(EdgeKind::Transitive);
        if !transitive.is_empty() {
            writeln!(out, "    transitively: {}", transitive.join(", ").dimmed())?;
        }

        if !module.dependents.is_empty() {
            let dependents: Vec<&str> = module.dependents.iter().map(|d| short(d.as_str())).collect();
            writeln!(out, "    used by: {}", dependents.join(", "))?;
        }
    }

    writeln!(
        out,
        "\n{} modules, {} direct edges, {} transitive edges, {} cycles",
        graph.modules.len(),
        graph.direct_edges().count(),
        graph.transitive_edges().count(),
        graph.cycles.len()
    )
}
