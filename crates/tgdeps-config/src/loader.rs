use crate::types::TgdepsConfig;
use crate::validation::{validate_config, ValidationError};
use std::io;
use std::path::{Path, PathBuf};
use tgdeps_fs::{FileSystem, NativeFileSystem};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".tgdeps.toml";

/// Errors that can occur while loading or writing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config file already exists at {0}")]
    ConfigExists(PathBuf),
}

/// Loads `.tgdeps.toml` through a [`FileSystem`].
///
/// Every load validates the result, so callers never see a configuration
/// with an unusable file name, a broken glob or a zero depth.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Where the configuration lives for the project `fs` is scoped to.
    pub fn config_path<F: FileSystem>(fs: &F) -> PathBuf {
        fs.project_root().join(CONFIG_FILE_NAME)
    }

    /// Loads the project's configuration; a missing file yields defaults.
    pub async fn discover<F: FileSystem>(fs: &F) -> Result<TgdepsConfig, ConfigError> {
        let path = Self::config_path(fs);
        if !fs.exists(&path).await? {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(TgdepsConfig::default());
        }
        Self::load_from(fs, &path).await
    }

    /// Loads configuration from a specific path inside the project.
    pub async fn load_from<F: FileSystem>(fs: &F, path: &Path) -> Result<TgdepsConfig, ConfigError> {
        if !fs.exists(path).await? {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs.read_to_string(path).await?;
        let config = Self::parse(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads configuration from any path on disk (`--config`).
    pub async fn load_file(path: &Path) -> Result<TgdepsConfig, ConfigError> {
        let config_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let fs = NativeFileSystem::new(config_dir)
            .map_err(|_| ConfigError::ConfigNotFound(path.to_path_buf()))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfigError::ConfigNotFound(path.to_path_buf()))?;

        Self::load_from(&fs, &fs.project_root().join(file_name)).await
    }

    /// Parses and validates configuration text.
    pub fn parse(contents: &str) -> Result<TgdepsConfig, ConfigError> {
        let config: TgdepsConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Writes the default configuration to the project root.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub async fn init<F: FileSystem>(fs: &F, force: bool) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path(fs);
        if !force && fs.exists(&path).await? {
            return Err(ConfigError::ConfigExists(path));
        }

        let rendered = TgdepsConfig::default().to_toml()?;
        fs.write(&path, &rendered).await?;
        Ok(path)
    }
}
