//! Report commands: load a project, build its graph, print one view of it.

use crate::formatters::{formatter_for, Formatter};
use crate::OutputFormat;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tgdeps_config::{validate_project_path, ConfigLoader, TgdepsConfig};
use tgdeps_core::{
    DependencyGraph, DependencyReport, ProjectMetrics, SourceStats, UnusedModulesReport,
};
use tgdeps_fs::NativeFileSystem;
use tgdeps_hcl::ProjectLoader;
use tokio::runtime::Runtime;
use tracing::debug;

/// Which view of the graph to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Deps,
    Unused,
    Cycles,
    Graph,
    Metrics,
}

/// Options for running a report.
pub struct AnalyzeOptions {
    pub path: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

/// A loaded project: where it lives, how it was configured, its graph.
pub struct Analysis {
    pub root: PathBuf,
    pub config: TgdepsConfig,
    pub graph: DependencyGraph,
    pub stats: SourceStats,
}

/// Runs one report and prints it to stdout.
///
/// Returns a failing exit code when the `cycles` report finds any cycle.
pub fn run_analysis(report: Report, options: &AnalyzeOptions) -> Result<ExitCode> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let analysis = runtime.block_on(analyze(&options.path, options.config.as_deref()))?;

    let formatter = formatter_for(options.format, &analysis.root);
    let output = render(report, &analysis, formatter.as_ref())?;
    println!("{}", output);

    if report == Report::Cycles && analysis.graph.has_cycles() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration and module records, then builds the graph.
pub async fn analyze(path: &Path, config_path: Option<&Path>) -> Result<Analysis> {
    let root = validate_project_path(path)
        .with_context(|| format!("Cannot analyze {}", path.display()))?;
    let fs = Arc::new(NativeFileSystem::new(&root).context("Failed to open project root")?);

    let config = match config_path {
        Some(config_path) => ConfigLoader::load_file(config_path)
            .await
            .with_context(|| format!("Failed to load config {}", config_path.display()))?,
        None => ConfigLoader::discover(fs.as_ref())
            .await
            .context("Failed to load .tgdeps.toml")?,
    };
    debug!(root = %root.display(), ?config, "analyzing project");

    let (records, stats) = ProjectLoader::new(fs)
        .config_filename(config.analysis.config_filename.clone())
        .ignore_patterns(config.discovery.ignore.clone())
        .discovery_options(config.discovery_options())
        .load_with_stats()
        .await
        .context("Failed to load project")?;

    let graph = config
        .graph_builder()
        .build(records)
        .context("Failed to build dependency graph")?;

    Ok(Analysis {
        root,
        config,
        graph,
        stats,
    })
}

/// Renders one view of an analysis with `formatter`.
pub fn render(report: Report, analysis: &Analysis, formatter: &dyn Formatter) -> Result<String> {
    let graph = &analysis.graph;
    match report {
        Report::Deps => formatter.dependency_report(&DependencyReport::from_graph(graph)),
        Report::Unused => formatter.unused_report(&UnusedModulesReport::from_graph(graph)),
        Report::Cycles => formatter.cycles(&graph.cycles),
        Report::Graph => formatter.graph(graph),
        Report::Metrics => {
            let metrics = ProjectMetrics::from_graph(graph, &analysis.root.to_string_lossy())
                .with_source_stats(&analysis.stats);
            formatter.metrics(&metrics)
        }
    }
}
