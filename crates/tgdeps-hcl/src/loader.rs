//! Project discovery: find every configuration file under a project root
//! and extract a record for each.

use crate::extractor::extract_record;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tgdeps_core::{Error, ModuleRecord, Result, SourceStats, DEFAULT_CONFIG_FILENAME};
use tgdeps_fs::{DiscoveryOptions, FileSystem};
use tracing::{debug, info, warn};

/// Directories skipped unless the caller supplies its own patterns.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/.terragrunt-cache/**"];

/// Loads module records from a project through a [`FileSystem`].
///
/// Works with both filesystem implementations:
/// - Native: walks the disk with `.gitignore` support
/// - Memory: filters pre-loaded files
pub struct ProjectLoader<F: FileSystem> {
    fs: Arc<F>,
    config_filename: String,
    ignore_patterns: Vec<String>,
    options: DiscoveryOptions,
}

impl<F: FileSystem> ProjectLoader<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self {
            fs,
            config_filename: DEFAULT_CONFIG_FILENAME.to_string(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            options: DiscoveryOptions::default(),
        }
    }

    /// Name of the per-directory configuration file to look for.
    pub fn config_filename(mut self, name: impl Into<String>) -> Self {
        self.config_filename = name.into();
        self
    }

    /// Glob patterns to skip; replaces the defaults.
    pub fn ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn discovery_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Configuration files under the project root, sorted by path.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the root is `/` or a system directory
    /// - `Error::Discovery` if the walk itself fails
    pub async fn discover(&self) -> Result<BTreeSet<PathBuf>> {
        let project_root = self.fs.project_root().to_path_buf();
        validate_project_root(&project_root)?;

        let file_names = [self.config_filename.as_str()];
        let ignore_patterns: Vec<&str> = self.ignore_patterns.iter().map(|s| s.as_str()).collect();

        self.fs
            .discover_files(&project_root, &file_names, &ignore_patterns, &self.options)
            .await
            .map_err(|e| Error::Discovery {
                root: project_root.clone(),
                message: e.to_string(),
            })
    }

    /// Discovers, reads and extracts every configuration file.
    ///
    /// Files that cannot be read are skipped with a warning. Records are
    /// returned sorted by identity.
    pub async fn load(&self) -> Result<Vec<ModuleRecord>> {
        self.load_with_stats().await.map(|(records, _)| records)
    }

    /// Like [`load`](Self::load), also measuring the files that were read.
    pub async fn load_with_stats(&self) -> Result<(Vec<ModuleRecord>, SourceStats)> {
        let files = self.discover().await?;
        let mut records = Vec::with_capacity(files.len());
        let mut stats = SourceStats::default();

        for path in &files {
            let content = match self.fs.read_to_string(path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable configuration file");
                    stats.unreadable += 1;
                    continue;
                }
            };

            stats.add(&content);
            let record = extract_record(identity_for(path), &content);
            debug!(
                identity = %record.identity,
                dependencies = record.dependency_paths.len(),
                "extracted module record"
            );
            records.push(record);
        }

        records.sort_by(|a, b| a.identity.cmp(&b.identity));

        info!(
            root = %self.fs.project_root().display(),
            modules = records.len(),
            lines = stats.lines,
            unreadable = stats.unreadable,
            "loaded project"
        );

        Ok((records, stats))
    }
}

/// Module identity for a discovered file: its path with `/` separators.
fn identity_for(path: &Path) -> String {
    let identity = path.to_string_lossy();
    if cfg!(windows) {
        identity.replace('\\', "/")
    } else {
        identity.into_owned()
    }
}

/// Refuses to scan the filesystem root or a system directory.
fn validate_project_root(root: &Path) -> Result<()> {
    if root == Path::new("/") {
        return Err(Error::InvalidConfig {
            message: "Refusing to scan filesystem root".to_string(),
        });
    }

    #[cfg(unix)]
    {
        const SYSTEM_DIRS: &[&str] = &[
            "/bin", "/boot", "/dev", "/etc", "/lib", "/lib64", "/opt", "/sbin", "/usr", "/var",
        ];
        const VIRTUAL_FS: &[&str] = &["/dev", "/proc", "/sys"];

        let system_dir = SYSTEM_DIRS.iter().any(|dir| root == Path::new(dir));
        let virtual_fs = VIRTUAL_FS.iter().any(|dir| root.starts_with(dir));
        if system_dir || virtual_fs {
            return Err(Error::InvalidConfig {
                message: format!("Refusing to scan system directory: {}", root.display()),
            });
        }
    }

    #[cfg(windows)]
    {
        let root_str = root.to_string_lossy().to_lowercase();
        if root_str.starts_with("c:\\windows") || root_str.starts_with("c:\\program files") {
            return Err(Error::InvalidConfig {
                message: "Refusing to scan Windows system directory".to_string(),
            });
        }
    }

    Ok(())
}
