//! End-to-end tests for the `tgdeps` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn unit(root: &Path, dir: &str, body: &str) {
    let path = root.join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("terragrunt.hcl"), body).unwrap();
}

fn tgdeps(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tgdeps"))
        .args(args)
        .arg("--no-color")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    unit(
        temp.path(),
        "live/app",
        r#"
dependency "db" {
  config_path = "../db"
}
"#,
    );
    unit(temp.path(), "live/db", "dependencies {\n  paths = [\"../vpc\"]\n}\n");
    unit(
        temp.path(),
        "live/vpc",
        "terraform {\n  source = \"git::https://example.com/modules.git//vpc\"\n}\n",
    );
    temp
}

#[test]
fn test_default_command_prints_dependency_report() {
    let temp = project();
    let output = tgdeps(&[temp.path().to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Terragrunt Dependency Report"));
    assert!(text.contains("Total modules: 3"));
    assert!(text.contains("live/app/terragrunt.hcl → live/db/terragrunt.hcl"));
}

#[test]
fn test_deps_json() {
    let temp = project();
    let output = tgdeps(&["deps", temp.path().to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["modules"].as_array().unwrap().len(), 3);
    assert_eq!(report["direct_dependencies"].as_array().unwrap().len(), 2);
    assert_eq!(report["transitive_dependencies"], 1);
}

#[test]
fn test_cycles_exit_status() {
    let clean = project();
    let output = tgdeps(&["cycles", clean.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No circular dependencies found"));

    let cyclic = TempDir::new().unwrap();
    unit(cyclic.path(), "a", "dependencies {\n  paths = [\"../b\"]\n}\n");
    unit(cyclic.path(), "b", "dependencies {\n  paths = [\"../a\"]\n}\n");

    let output = tgdeps(&["cycles", cyclic.path().to_str().unwrap(), "-o", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["count"], 1);
}

#[test]
fn test_unused_report() {
    let temp = project();
    unit(temp.path(), "legacy", "inputs = {\n  name = \"old\"\n}\n");

    let output = tgdeps(&["unused", temp.path().to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Isolated modules: 1"));
    assert!(text.contains("legacy/terragrunt.hcl"));
}

#[test]
fn test_config_init_then_validate() {
    let temp = project();
    let root = temp.path().to_str().unwrap();

    let output = tgdeps(&["config", "init", root]);
    assert!(output.status.success());
    assert!(temp.path().join(".tgdeps.toml").exists());

    let output = tgdeps(&["config", "validate", root]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Config is valid"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = project();
    fs::write(temp.path().join(".tgdeps.toml"), "[analysis]\nunknown = 1\n").unwrap();

    let output = tgdeps(&["deps", temp.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_path_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    let output = tgdeps(&["graph", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_metrics_command() {
    let temp = project();
    let root = temp.path().to_str().unwrap();

    let output = tgdeps(&["metrics", root]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Max depth: 2"));

    let output = tgdeps(&["metrics", root, "--json"]);
    assert!(output.status.success());
    let metrics: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(metrics["modules"], 3);
    assert_eq!(metrics["directories"], 4);
    assert_eq!(metrics["transitive_dependencies"], 1);
    assert_eq!(metrics["sourced_modules"], 1);
}
