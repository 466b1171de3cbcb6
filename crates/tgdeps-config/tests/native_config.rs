use std::fs;
use tempfile::TempDir;
use tgdeps_config::{ConfigError, ConfigLoader, TgdepsConfig, CONFIG_FILE_NAME};
use tgdeps_fs::NativeFileSystem;

#[tokio::test]
async fn test_init_writes_loadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let fs = NativeFileSystem::new(temp_dir.path()).unwrap();

    let path = ConfigLoader::init(&fs, false).await.unwrap();
    assert!(path.ends_with(CONFIG_FILE_NAME));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[analysis]"));
    assert!(written.contains("[discovery]"));

    let config = ConfigLoader::discover(&fs).await.unwrap();
    assert_eq!(config, TgdepsConfig::default());
}

#[tokio::test]
async fn test_load_file_outside_project() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ci.toml");
    fs::write(
        &path,
        r#"
[analysis]
dedupe_cycles = false

[discovery]
ignore = ["**/.terragrunt-cache/**", "sandbox/**"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_file(&path).await.unwrap();
    assert!(!config.analysis.dedupe_cycles);
    assert_eq!(config.discovery.ignore.len(), 2);
}

#[tokio::test]
async fn test_load_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_file(&temp_dir.path().join("absent.toml")).await;
    assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
}

#[tokio::test]
async fn test_config_drives_builder() {
    let config = ConfigLoader::parse(
        "[analysis]\nconfig_filename = \"unit.hcl\"\n",
    )
    .unwrap();

    let graph = config
        .graph_builder()
        .build(vec![
            tgdeps_core::ModuleRecord::new("/live/app/unit.hcl").with_dependency("../vpc"),
            tgdeps_core::ModuleRecord::new("/live/vpc/unit.hcl"),
        ])
        .unwrap();

    assert_eq!(graph.direct_edges().count(), 1);
}
