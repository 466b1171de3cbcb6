use crate::OutputFormat;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tgdeps_config::{validate_project_path, ConfigLoader, TgdepsConfig};
use tgdeps_fs::NativeFileSystem;
use tokio::runtime::Runtime;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a default .tgdeps.toml to the project root
    Init {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Check the configuration for errors
    Validate {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },
}

pub fn handle_config_command(
    cmd: ConfigCommand,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    runtime.block_on(async {
        match cmd {
            ConfigCommand::Init { path, force } => init_config(&path, force).await,
            ConfigCommand::Show { path } => show_config(&path, config, format).await,
            ConfigCommand::Validate { path } => validate_config(&path, config).await,
        }
    })
}

fn project_fs(path: &Path) -> Result<NativeFileSystem> {
    let root = validate_project_path(path)
        .with_context(|| format!("Invalid project path {}", path.display()))?;
    NativeFileSystem::new(&root).context("Failed to open project root")
}

/// Configuration in effect for a project, and where it came from.
async fn effective_config(path: &Path, config: Option<&Path>) -> Result<(TgdepsConfig, String)> {
    if let Some(config_path) = config {
        let loaded = ConfigLoader::load_file(config_path)
            .await
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        return Ok((loaded, config_path.display().to_string()));
    }

    let fs = project_fs(path)?;
    let config_path = ConfigLoader::config_path(&fs);
    let loaded = ConfigLoader::discover(&fs)
        .await
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "defaults".to_string()
    };
    Ok((loaded, source))
}

async fn init_config(path: &Path, force: bool) -> Result<ExitCode> {
    let fs = project_fs(path)?;
    let config_path = ConfigLoader::config_path(&fs);

    if !force && config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("To reinitialize, run again with --force.");
        return Ok(ExitCode::SUCCESS);
    }

    let written = ConfigLoader::init(&fs, force)
        .await
        .context("Failed to write config")?;
    println!("{} Initialized config at: {}", "✓".green(), written.display());
    Ok(ExitCode::SUCCESS)
}

async fn show_config(path: &Path, config: Option<&Path>, format: OutputFormat) -> Result<ExitCode> {
    let (loaded, source) = effective_config(path, config).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&loaded).context("Error serializing config")?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("# Source: {}", source);
            print!("{}", loaded.to_toml().context("Error rendering config")?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn validate_config(path: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let (loaded, source) = effective_config(path, config).await?;

    println!("{} Config is valid", "✓".green());
    println!("  Source: {}", source);
    println!("  Config file name: {}", loaded.analysis.config_filename);
    println!("  Deduplicate cycles: {}", loaded.analysis.dedupe_cycles);
    println!("  Ignore patterns: {}", loaded.discovery.ignore.len());
    println!("  Max depth: {}", loaded.discovery.max_depth);

    Ok(ExitCode::SUCCESS)
}
