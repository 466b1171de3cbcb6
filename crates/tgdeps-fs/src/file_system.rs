//! FileSystem trait for platform-agnostic filesystem operations.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// File metadata compatible across implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Whether the path exists.
    pub exists: bool,
    /// Whether the path is a file (false if directory or doesn't exist).
    pub is_file: bool,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// Whether the path is a symbolic link.
    pub is_symlink: bool,
    /// File size in bytes (0 for directories or non-existent files).
    pub size: u64,
}

impl FileMetadata {
    pub(crate) fn missing() -> Self {
        Self {
            exists: false,
            is_file: false,
            is_dir: false,
            is_symlink: false,
            size: 0,
        }
    }
}

/// Options for file discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Maximum file size to include (bytes).
    pub max_file_size: Option<u64>,

    /// Follow symbolic links (default: false).
    pub follow_symlinks: bool,

    /// Maximum directory depth (default: 100).
    pub max_depth: usize,

    /// Include hidden files and directories (default: false).
    ///
    /// `.terragrunt-cache` is hidden, so the default also skips Terragrunt's
    /// downloaded copies of every unit.
    pub include_hidden: bool,

    /// Respect .gitignore files (default: true).
    pub respect_gitignore: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default
            follow_symlinks: false,
            max_depth: 100,
            include_hidden: false,
            respect_gitignore: true,
        }
    }
}

/// Platform-agnostic filesystem abstraction.
///
/// All operations are scoped to a project root; paths escaping it are
/// rejected with `io::ErrorKind::PermissionDenied`.
///
/// ## Error Handling
///
/// Uses `std::io::Result<T>` so native errors map through unchanged and the
/// in-memory implementation constructs errors with matching kinds.
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::NotFound` if file doesn't exist.
    /// Returns `io::ErrorKind::InvalidData` if file is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Get file/directory metadata.
    ///
    /// Returns metadata even if the file doesn't exist (exists=false).
    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Write string contents to a file, creating parent directories.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Discover files whose name is one of `file_names`.
    ///
    /// # Parameters
    ///
    /// - `root`: Starting directory (must be within project root)
    /// - `file_names`: Exact file names to include (e.g., ["terragrunt.hcl"])
    /// - `ignore_patterns`: Glob patterns to skip (e.g., ["**/.terragrunt-cache/**"])
    /// - `options`: Additional discovery options
    ///
    /// # Returns
    ///
    /// Sorted set of absolute paths to discovered files.
    async fn discover_files(
        &self,
        root: &Path,
        file_names: &[&str],
        ignore_patterns: &[&str],
        options: &DiscoveryOptions,
    ) -> io::Result<BTreeSet<PathBuf>>;

    /// Get the project root this filesystem is scoped to.
    fn project_root(&self) -> &Path;
}

/// Lexical normalization shared by the implementations.
///
/// Removes `.` and resolves `..` without touching the disk. A `..` that
/// would climb above the root is rejected.
pub(crate) fn normalize_lexically(path: &Path) -> io::Result<PathBuf> {
    use std::path::Component;

    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                result.push(component.as_os_str());
                depth = 0;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("Path escapes its root: {}", path.display()),
                    ));
                }
                result.pop();
                depth -= 1;
            }
            Component::Normal(name) => {
                result.push(name);
                depth += 1;
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        let normalized = normalize_lexically(Path::new("/live/./prod/../vpc")).unwrap();
        assert_eq!(normalized, PathBuf::from("/live/vpc"));
    }

    #[test]
    fn test_normalize_rejects_escape() {
        let err = normalize_lexically(Path::new("/live/../../etc")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
