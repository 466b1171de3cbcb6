use crate::types::TgdepsConfig;
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Validation errors for configuration values and project paths.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Path does not exist: {0}")]
    PathDoesNotExist(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Path is not readable: {0}")]
    NotReadable(PathBuf),

    #[error("Invalid config_filename {0:?}: must be a plain file name")]
    InvalidConfigFilename(String),

    #[error("Invalid ignore pattern {pattern:?}: {message}")]
    InvalidIgnorePattern { pattern: String, message: String },

    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,
}

/// Validate and canonicalize a project path
///
/// This function ensures:
/// 1. The path exists
/// 2. It's a directory
/// 3. It's readable
/// 4. Symlinks are resolved (canonicalized)
pub fn validate_project_path(path: &Path) -> Result<PathBuf, ValidationError> {
    let canonical = path
        .canonicalize()
        .map_err(|_| ValidationError::PathDoesNotExist(path.to_path_buf()))?;

    if !canonical.is_dir() {
        return Err(ValidationError::NotADirectory(canonical));
    }

    if fs::read_dir(&canonical).is_err() {
        return Err(ValidationError::NotReadable(canonical));
    }

    Ok(canonical)
}

/// Checks every setting of a loaded configuration.
pub fn validate_config(config: &TgdepsConfig) -> Result<(), ValidationError> {
    validate_config_filename(&config.analysis.config_filename)?;

    for pattern in &config.discovery.ignore {
        Glob::new(pattern).map_err(|e| ValidationError::InvalidIgnorePattern {
            pattern: pattern.clone(),
            message: e.kind().to_string(),
        })?;
    }

    if config.discovery.max_depth == 0 {
        return Err(ValidationError::ZeroMaxDepth);
    }

    Ok(())
}

/// The configuration file name must name a file, not a path.
fn validate_config_filename(name: &str) -> Result<(), ValidationError> {
    let invalid = name.trim().is_empty()
        || name != name.trim()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
        || name.chars().any(|c| c.is_control());

    if invalid {
        return Err(ValidationError::InvalidConfigFilename(name.to_string()));
    }

    Ok(())
}
