//! JSON formatter for reports.

use super::Formatter;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tgdeps_core::{DependencyGraph, DependencyReport, ProjectMetrics, UnusedModulesReport};

pub struct JsonFormatter;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Error serializing results")
}

impl Formatter for JsonFormatter {
    fn dependency_report(&self, report: &DependencyReport) -> Result<String> {
        to_json(report)
    }

    fn unused_report(&self, report: &UnusedModulesReport) -> Result<String> {
        to_json(report)
    }

    fn cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        to_json(&json!({
            "count": cycles.len(),
            "cycles": cycles,
        }))
    }

    fn graph(&self, graph: &DependencyGraph) -> Result<String> {
        to_json(graph)
    }

    fn metrics(&self, metrics: &ProjectMetrics) -> Result<String> {
        to_json(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgdeps_core::{build_graph, ModuleRecord};

    fn sample() -> DependencyGraph {
        build_graph(vec![
            ModuleRecord::new("/live/app/terragrunt.hcl").with_dependency("../db"),
            ModuleRecord::new("/live/db/terragrunt.hcl").with_dependency("../vpc"),
            ModuleRecord::new("/live/vpc/terragrunt.hcl"),
        ])
        .unwrap()
    }

    #[test]
    fn test_graph_json_shape() {
        let output = JsonFormatter.graph(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["modules"].as_object().unwrap().len(), 3);
        assert_eq!(value["edges"].as_array().unwrap().len(), 3);
        assert_eq!(value["edges"][2]["kind"], "transitive");
        assert_eq!(value["orphaned"][0], "/live/app/terragrunt.hcl");
    }

    #[test]
    fn test_dependency_report_json() {
        let report = DependencyReport::from_graph(&sample());
        let output = JsonFormatter.dependency_report(&report).unwrap();
        let parsed: DependencyReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_empty_cycles_json() {
        let output = JsonFormatter.cycles(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 0);
        assert!(value["cycles"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_metrics_json() {
        let metrics = ProjectMetrics::from_graph(&sample(), "/live");
        let output = JsonFormatter.metrics(&metrics).unwrap();
        let parsed: ProjectMetrics = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed, metrics);
        assert_eq!(parsed.transitive_dependencies, 1);
    }
}
