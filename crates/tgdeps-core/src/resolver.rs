//! Dependency path resolution.
//!
//! Declared paths are resolved against the directory that holds the
//! declaring module. Resolution is lexical: nothing touches the disk, and a
//! path that points nowhere simply fails to match a module later on.
//!
//! Terragrunt configurations always use `/` as the separator, so identities
//! are handled as strings rather than `Path`s.

use serde::Serialize;
use std::fmt;

/// A declared dependency after resolution against its declaring module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedPath(String);

impl ResolvedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves `raw` as declared by the module `from_identity`.
///
/// Absolute paths are only normalized. Everything else, including bare
/// names without a `./` prefix, is taken relative to the directory
/// containing `from_identity` and normalized.
pub fn resolve(raw: &str, from_identity: &str) -> ResolvedPath {
    if raw.starts_with('/') {
        return ResolvedPath(normalize(raw));
    }

    ResolvedPath(join(parent_dir(from_identity), raw))
}

/// Directory portion of `path`.
///
/// Returns `"."` for a bare file name and `"/"` for a file at the root.
pub fn parent_dir(path: &str) -> &str {
    let trimmed = trim_trailing_separators(path);
    match trimmed.rfind('/') {
        None => ".",
        Some(0) => "/",
        Some(idx) => &trimmed[..idx],
    }
}

/// Joins `name` onto `dir` and normalizes the result.
pub fn join(dir: &str, name: &str) -> String {
    if name.starts_with('/') {
        return normalize(name);
    }
    if dir.is_empty() || dir == "." {
        return normalize(name);
    }
    normalize(&format!("{}/{}", dir, name))
}

/// Collapses `.`, `..` and repeated separators.
///
/// `..` above the root of an absolute path is dropped; leading `..` of a
/// relative path is kept since there is nothing to cancel it against.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            normal => segments.push(normal),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}
