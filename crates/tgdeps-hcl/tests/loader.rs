//! Loader tests against both filesystem implementations.

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tgdeps_core::{build_graph, Error};
use tgdeps_fs::{DiscoveryOptions, MemoryFileSystem, NativeFileSystem};
use tgdeps_hcl::ProjectLoader;

fn memory_project() -> MemoryFileSystem {
    let fs = MemoryFileSystem::empty("/infra").unwrap();
    fs.add_file(
        "/infra/live/prod/app/terragrunt.hcl",
        r#"
include "root" {
  path = find_in_parent_folders()
}

dependency "vpc" {
  config_path = "../vpc"
}

dependency "db" {
  config_path = "../db"
}

inputs = {
  vpc_id = dependency.vpc.outputs.vpc_id
  name   = "app"
}
"#,
    )
    .unwrap();
    fs.add_file(
        "/infra/live/prod/db/terragrunt.hcl",
        r#"
dependencies {
  paths = ["../vpc"]
}
"#,
    )
    .unwrap();
    fs.add_file(
        "/infra/live/prod/vpc/terragrunt.hcl",
        r#"
terraform {
  source = "git::https://example.com/modules.git//vpc?ref=v1.0.0"
}
"#,
    )
    .unwrap();
    fs.add_file("/infra/live/prod/legacy/terragrunt.hcl", "inputs = {}\n")
        .unwrap();
    fs.add_file(
        "/infra/live/prod/app/.terragrunt-cache/abc/terragrunt.hcl",
        "dependency \"x\" {\n  config_path = \"../x\"\n}\n",
    )
    .unwrap();
    fs.add_file("/infra/live/prod/app/main.tf", "").unwrap();
    fs
}

#[tokio::test]
async fn test_load_memory_project() {
    let loader = ProjectLoader::new(Arc::new(memory_project()));
    let records = loader.load().await.unwrap();

    let identities: Vec<_> = records.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(
        identities,
        vec![
            "/infra/live/prod/app/terragrunt.hcl",
            "/infra/live/prod/db/terragrunt.hcl",
            "/infra/live/prod/legacy/terragrunt.hcl",
            "/infra/live/prod/vpc/terragrunt.hcl",
        ]
    );
    assert_eq!(records[0].dependency_paths, vec!["../vpc", "../db"]);
    assert_eq!(
        records[3].source.as_deref(),
        Some("git::https://example.com/modules.git//vpc?ref=v1.0.0")
    );
}

#[tokio::test]
async fn test_loaded_project_builds_graph() {
    let records = ProjectLoader::new(Arc::new(memory_project()))
        .load()
        .await
        .unwrap();
    let graph = build_graph(records).unwrap();

    assert_eq!(graph.direct_edges().count(), 3);
    assert_eq!(graph.transitive_edges().count(), 0);
    assert_eq!(
        graph.orphaned,
        vec![
            "/infra/live/prod/app/terragrunt.hcl",
            "/infra/live/prod/legacy/terragrunt.hcl",
        ]
    );
    assert_eq!(graph.isolated, vec!["/infra/live/prod/legacy/terragrunt.hcl"]);
}

#[tokio::test]
async fn test_custom_config_filename_and_ignores() {
    let fs = memory_project();
    fs.add_file("/infra/units/a/unit.hcl", "").unwrap();
    fs.add_file("/infra/units/b/unit.hcl", "").unwrap();

    let records = ProjectLoader::new(Arc::new(fs))
        .config_filename("unit.hcl")
        .ignore_patterns(["units/b/**"])
        .load()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity, "/infra/units/a/unit.hcl");
}

#[tokio::test]
async fn test_hidden_directories_included_on_request() {
    let options = DiscoveryOptions {
        include_hidden: true,
        ..DiscoveryOptions::default()
    };

    let records = ProjectLoader::new(Arc::new(memory_project()))
        .ignore_patterns(Vec::<String>::new())
        .discovery_options(options)
        .load()
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn test_load_native_project() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("live/vpc")).unwrap();
    fs::create_dir_all(root.join("live/app")).unwrap();
    fs::write(root.join("live/vpc/terragrunt.hcl"), "").unwrap();
    fs::write(
        root.join("live/app/terragrunt.hcl"),
        "dependency \"vpc\" {\n  config_path = \"../vpc\"\n}\n",
    )
    .unwrap();

    let fs = NativeFileSystem::new(root).unwrap();
    let records = ProjectLoader::new(Arc::new(fs)).load().await.unwrap();

    assert_eq!(records.len(), 2);
    let graph = build_graph(records).unwrap();
    assert_eq!(graph.direct_edges().count(), 1);
    assert!(graph.cycles.is_empty());
}

#[tokio::test]
async fn test_empty_project_loads_nothing() {
    let fs = MemoryFileSystem::empty("/infra").unwrap();
    let records = ProjectLoader::new(Arc::new(fs)).load().await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_refuses_filesystem_root() {
    let fs = MemoryFileSystem::empty("/").unwrap();
    let err = ProjectLoader::new(Arc::new(fs)).load().await.unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_load_with_stats() {
    let fs = MemoryFileSystem::empty("/infra").unwrap();
    fs.add_file("/infra/vpc/terragrunt.hcl", "inputs = {\n  cidr = \"10.0.0.0/16\"\n}\n")
        .unwrap();
    fs.add_file("/infra/app/terragrunt.hcl", "dependencies {\n  paths = [\"../vpc\"]\n}\n")
        .unwrap();

    let (records, stats) = ProjectLoader::new(Arc::new(fs)).load_with_stats().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.lines, 6);
    assert_eq!(stats.unreadable, 0);
    assert_eq!(stats.bytes, 74);
}

#[tokio::test]
async fn test_non_ascii_configs_load() {
    let fs = MemoryFileSystem::empty("/infra").unwrap();
    fs.add_file(
        "/infra/app/terragrunt.hcl",
        "\u{feff}locals {\n  région = \"eu\"\n}\n\ndependency \"vpc\" {\n  config_path = \"../vpc\"\n}\n",
    )
    .unwrap();
    fs.add_file("/infra/vpc/terragrunt.hcl", "").unwrap();

    let records = ProjectLoader::new(Arc::new(fs)).load().await.unwrap();
    let graph = build_graph(records).unwrap();

    assert_eq!(graph.direct_edges().count(), 1);
    assert_eq!(
        graph.dependents_of("/infra/vpc/terragrunt.hcl").to_vec(),
        vec!["/infra/app/terragrunt.hcl".to_string()]
    );
}

#[tokio::test]
async fn test_ci_workspace_under_var_is_allowed() {
    let fs = MemoryFileSystem::empty("/var/lib/jenkins/workspace/infra").unwrap();
    fs.add_file("/var/lib/jenkins/workspace/infra/vpc/terragrunt.hcl", "")
        .unwrap();

    let records = ProjectLoader::new(Arc::new(fs)).load().await.unwrap();
    assert_eq!(records.len(), 1);
}
