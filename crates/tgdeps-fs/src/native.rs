//! Native filesystem implementation using std::fs + tokio.

use crate::file_system::normalize_lexically;
use crate::{DiscoveryOptions, FileMetadata, FileSystem};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

/// Native filesystem implementation using std::fs + tokio.
///
/// Blocking std::fs calls run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    project_root: PathBuf,
}

impl NativeFileSystem {
    /// Create a new native filesystem scoped to a project root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root doesn't exist or can't be canonicalized.
    pub fn new(project_root: impl AsRef<Path>) -> io::Result<Self> {
        let root = project_root.as_ref();
        let project_root = root.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Project root {} is not accessible: {}", root.display(), e),
            )
        })?;

        Ok(Self { project_root })
    }

    /// Validate that a path is within the project root.
    ///
    /// Existing paths are canonicalized so symlinks cannot point outside the
    /// root; missing paths are normalized lexically instead.
    fn validate_path(&self, path: &Path) -> io::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };

        let resolved = match absolute.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) => match (absolute.parent(), absolute.file_name()) {
                (Some(parent), Some(name)) => match parent.canonicalize() {
                    Ok(canonical_parent) => canonical_parent.join(name),
                    Err(_) => normalize_lexically(&absolute)?,
                },
                _ => normalize_lexically(&absolute)?,
            },
        };

        if !resolved.starts_with(&self.project_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "Path traversal detected: {} is outside project root {}",
                    resolved.display(),
                    self.project_root.display()
                ),
            ));
        }

        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl FileSystem for NativeFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let validated = self.validate_path(path)?;
        task::spawn_blocking(move || Ok(validated.exists()))
            .await
            .map_err(io::Error::other)?
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let validated = self.validate_path(path)?;
        task::spawn_blocking(move || std::fs::read_to_string(&validated))
            .await
            .map_err(io::Error::other)?
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let validated = self.validate_path(path)?;
        task::spawn_blocking(move || match std::fs::symlink_metadata(&validated) {
            Ok(meta) => Ok(FileMetadata {
                exists: true,
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
                is_symlink: meta.file_type().is_symlink(),
                size: meta.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileMetadata::missing()),
            Err(e) => Err(e),
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let validated = self.validate_path(path)?;
        let contents = contents.to_string();
        task::spawn_blocking(move || {
            if let Some(parent) = validated.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&validated, contents)
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn discover_files(
        &self,
        root: &Path,
        file_names: &[&str],
        ignore_patterns: &[&str],
        options: &DiscoveryOptions,
    ) -> io::Result<BTreeSet<PathBuf>> {
        let validated_root = self.validate_path(root)?;
        let file_names: Vec<String> = file_names.iter().map(|s| s.to_string()).collect();
        let ignore_patterns: Vec<String> = ignore_patterns.iter().map(|s| s.to_string()).collect();
        let opts = options.clone();
        let project_root = self.project_root.clone();

        task::spawn_blocking(move || {
            discover_files_sync(&validated_root, &file_names, &ignore_patterns, &opts, &project_root)
        })
        .await
        .map_err(io::Error::other)?
    }

    fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Synchronous file discovery implementation.
fn discover_files_sync(
    root: &Path,
    file_names: &[String],
    ignore_patterns: &[String],
    options: &DiscoveryOptions,
    project_root: &Path,
) -> io::Result<BTreeSet<PathBuf>> {
    let mut discovered = BTreeSet::new();

    let mut walker = WalkBuilder::new(root);
    walker
        .follow_links(options.follow_symlinks)
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .max_depth(Some(options.max_depth))
        .max_filesize(options.max_file_size);

    if !ignore_patterns.is_empty() {
        let mut overrides = ignore::overrides::OverrideBuilder::new(root);
        for pattern in ignore_patterns {
            overrides
                .add(&format!("!{}", pattern))
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        let built = overrides
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        walker.overrides(built);
    }

    for result in walker.build() {
        let entry = result.map_err(io::Error::other)?;

        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        let matches_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| file_names.iter().any(|wanted| wanted == name))
            .unwrap_or(false);
        if !matches_name {
            continue;
        }

        // Symlinked files may resolve outside the root; keep only those inside.
        if let Ok(canonical) = path.canonicalize() {
            if canonical.starts_with(project_root) {
                discovered.insert(canonical);
            }
        }
    }

    Ok(discovered)
}
