//! In-memory filesystem implementation.

use crate::file_system::normalize_lexically;
use crate::{DiscoveryOptions, FileMetadata, FileSystem};
use globset::{Glob, GlobSetBuilder};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filesystem backed by a map of path to contents.
///
/// Lets hosts that already hold configuration text in memory (editors,
/// services, tests) run the same loader as the CLI.
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<HashMap>>` for interior mutability:
/// - Multiple concurrent readers (common case)
/// - Exclusive writer (setup and `write`)
#[derive(Clone, Debug)]
pub struct MemoryFileSystem {
    project_root: PathBuf,
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    /// Create a filesystem from pre-loaded files.
    ///
    /// # Parameters
    ///
    /// - `project_root`: Virtual project root (e.g., "/repo")
    /// - `files`: Map of absolute paths to file contents
    pub fn new(
        project_root: impl AsRef<Path>,
        files: HashMap<PathBuf, String>,
    ) -> io::Result<Self> {
        let project_root = normalize_lexically(project_root.as_ref())?;

        let mut normalized_files = HashMap::with_capacity(files.len());
        for (path, contents) in files {
            let normalized = normalize_lexically(&path)?;
            if !normalized.starts_with(&project_root) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("File path outside project root: {}", path.display()),
                ));
            }
            normalized_files.insert(normalized, contents);
        }

        Ok(Self {
            project_root,
            files: Arc::new(RwLock::new(normalized_files)),
        })
    }

    /// Create an empty filesystem (useful for testing).
    pub fn empty(project_root: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(project_root, HashMap::new())
    }

    /// Add a file (used during setup).
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) -> io::Result<()> {
        let normalized = self.validate_path(path.as_ref())?;
        self.files.write().insert(normalized, contents.into());
        Ok(())
    }

    /// Validate path against project root.
    fn validate_path(&self, path: &Path) -> io::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };
        let normalized = normalize_lexically(&absolute)?;

        if !normalized.starts_with(&self.project_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "Path traversal detected: {} is outside {}",
                    normalized.display(),
                    self.project_root.display()
                ),
            ));
        }

        Ok(normalized)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

#[async_trait::async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let normalized = self.validate_path(path)?;
        let is_file = self.files.read().contains_key(&normalized);
        Ok(is_file || self.is_dir(&normalized))
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let normalized = self.validate_path(path)?;
        self.files.read().get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", normalized.display()),
            )
        })
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let normalized = self.validate_path(path)?;

        let size = self.files.read().get(&normalized).map(|c| c.len() as u64);
        if let Some(size) = size {
            return Ok(FileMetadata {
                exists: true,
                is_file: true,
                is_dir: false,
                is_symlink: false,
                size,
            });
        }

        if self.is_dir(&normalized) {
            return Ok(FileMetadata {
                exists: true,
                is_file: false,
                is_dir: true,
                is_symlink: false,
                size: 0,
            });
        }

        Ok(FileMetadata::missing())
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let normalized = self.validate_path(path)?;
        self.files.write().insert(normalized, contents.to_string());
        Ok(())
    }

    async fn discover_files(
        &self,
        root: &Path,
        file_names: &[&str],
        ignore_patterns: &[&str],
        options: &DiscoveryOptions,
    ) -> io::Result<BTreeSet<PathBuf>> {
        let normalized_root = self.validate_path(root)?;

        let mut builder = GlobSetBuilder::new();
        for pattern in ignore_patterns {
            let glob =
                Glob::new(pattern).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            builder.add(glob);
        }
        let ignored = builder
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let files = self.files.read();
        let discovered = files
            .iter()
            .filter(|(path, _)| path.starts_with(&normalized_root))
            .filter(|(_, contents)| {
                options
                    .max_file_size
                    .map_or(true, |max| contents.len() as u64 <= max)
            })
            .map(|(path, _)| path)
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| file_names.contains(&name))
                    .unwrap_or(false)
            })
            .filter(|path| {
                let relative = path.strip_prefix(&normalized_root).unwrap_or(path.as_path());
                let depth = relative.components().count();
                depth <= options.max_depth
                    && (options.include_hidden || !is_hidden(relative))
                    && !ignored.is_match(relative)
                    && !ignored.is_match(path)
            })
            .cloned()
            .collect();

        Ok(discovered)
    }

    fn project_root(&self) -> &Path {
        &self.project_root
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .map(|name| name.starts_with('.') && name != "." && name != "..")
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemoryFileSystem {
        let fs = MemoryFileSystem::empty("/repo").unwrap();
        fs.add_file("/repo/live/vpc/terragrunt.hcl", "").unwrap();
        fs.add_file("/repo/live/app/terragrunt.hcl", "").unwrap();
        fs.add_file("/repo/live/app/.terragrunt-cache/x/terragrunt.hcl", "").unwrap();
        fs.add_file("/repo/legacy/terragrunt.hcl", "").unwrap();
        fs.add_file("/repo/live/README.md", "").unwrap();
        fs
    }

    #[tokio::test]
    async fn test_discover_by_name_skips_hidden() {
        let fs = fixture();
        let found = fs
            .discover_files(Path::new("/repo"), &["terragrunt.hcl"], &[], &DiscoveryOptions::default())
            .await
            .unwrap();

        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|p| !p.to_string_lossy().contains(".terragrunt-cache")));
    }

    #[tokio::test]
    async fn test_discover_honors_ignore_patterns() {
        let fs = fixture();
        let found = fs
            .discover_files(
                Path::new("/repo"),
                &["terragrunt.hcl"],
                &["legacy/**"],
                &DiscoveryOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_read_and_metadata() {
        let fs = MemoryFileSystem::empty("/repo").unwrap();
        fs.write(Path::new("live/terragrunt.hcl"), "inputs = {}").await.unwrap();

        let contents = fs.read_to_string(Path::new("/repo/live/terragrunt.hcl")).await.unwrap();
        assert_eq!(contents, "inputs = {}");

        let meta = fs.metadata(Path::new("/repo/live")).await.unwrap();
        assert!(meta.is_dir);
        assert!(fs.exists(Path::new("/repo/live")).await.unwrap());
        assert!(!fs.exists(Path::new("/repo/nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_blocked() {
        let fs = MemoryFileSystem::empty("/repo").unwrap();
        let err = fs.read_to_string(Path::new("/etc/passwd")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
