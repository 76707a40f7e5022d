// src/fs/artifact.rs

//! Scoped ownership of a temporary file created during a run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{ImpactError, Result};
use crate::fs::remove_if_exists;

/// A file the run creates and must remove on every exit path.
///
/// Tracking starts *before* the file is created, so a step that fails
/// half-way through writing still gets its output removed. Call
/// [`TempArtifact::release`] to remove it and observe the error; if the
/// guard is dropped unreleased (early return, panic, cancelled future) the
/// file is removed in `Drop` and a failure is only logged.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    armed: bool,
}

impl TempArtifact {
    pub fn track(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now. A file that was never created is not an error.
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        remove(&self.path)
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = remove(&self.path) {
            warn!(error = %e, "temporary artifact left behind");
        }
    }
}

fn remove(path: &Path) -> Result<()> {
    match remove_if_exists(path) {
        Ok(true) => {
            debug!(path = %path.display(), "removed temporary artifact");
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(e) => Err(ImpactError::CleanupError(format!(
            "removing {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incremental.csv");
        std::fs::write(&path, "\"a\",\"b\",\"\"\n").unwrap();

        TempArtifact::track(&path).release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_file_on_early_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incremental.gradle");

        let outcome: std::result::Result<(), &str> = (|| {
            let _artifact = TempArtifact::track(&path);
            std::fs::write(&path, "task x").unwrap();
            Err("step failed")
        })();

        assert!(outcome.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn release_of_never_created_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        TempArtifact::track(dir.path().join("missing.csv"))
            .release()
            .unwrap();
    }

    #[test]
    fn release_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be removed with remove_file.
        let path = dir.path().join("incremental.csv");
        std::fs::create_dir(&path).unwrap();

        let err = TempArtifact::track(&path).release().unwrap_err();
        assert!(matches!(err, ImpactError::CleanupError(_)));
    }
}
