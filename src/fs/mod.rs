// src/fs/mod.rs

//! Small filesystem helpers shared by the gradle steps and impact analysis.

use std::io;
use std::path::Path;

pub mod artifact;

pub use artifact::TempArtifact;

/// Remove a file, treating "already gone" as success.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (symlinks, `/private/var` vs `/var` on macOS), we
///   canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(normalize_separators(&rel.to_string_lossy()));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(normalize_separators(&rel.to_string_lossy()));
        }
    }

    None
}

/// Forward slashes, no leading `./`, no trailing `/`.
pub fn normalize_separators(s: &str) -> String {
    let s = s.replace('\\', "/");
    let mut s = s.as_str();
    while let Some(rest) = s.strip_prefix("./") {
        s = rest;
    }
    if s == "." {
        return String::new();
    }
    s.trim_end_matches('/').to_string()
}
