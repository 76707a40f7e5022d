// src/config/run.rs

use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;
use crate::errors::{ImpactError, Result};

/// Everything one run needs, checked once at the boundary.
///
/// The orchestrator receives this by value and never consults the CLI,
/// environment or config file again.
#[derive(Debug, Clone)]
pub struct RunConfig {
    project_dir: PathBuf,
    base: String,
    target: String,
    settings: ConfigFile,
}

impl RunConfig {
    pub fn new(
        project_dir: impl AsRef<Path>,
        base: impl Into<String>,
        target: impl Into<String>,
        settings: ConfigFile,
    ) -> Result<Self> {
        let project_dir = resolve_project_dir(project_dir.as_ref())?;
        let base = validate_revision("base", base.into())?;
        let target = validate_revision("target", target.into())?;

        Ok(Self {
            project_dir,
            base,
            target,
            settings,
        })
    }

    /// Absolute, canonical project directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn settings(&self) -> &ConfigFile {
        &self.settings
    }

    /// `<base>..<target>` as handed to git.
    pub fn revision_range(&self) -> String {
        format!("{}..{}", self.base, self.target)
    }
}

/// Canonicalize and check that the project directory exists.
pub fn resolve_project_dir(dir: &Path) -> Result<PathBuf> {
    let canonical = dir.canonicalize().map_err(|e| {
        ImpactError::ConfigError(format!(
            "project directory {} is not accessible: {e}",
            dir.display()
        ))
    })?;

    if !canonical.is_dir() {
        return Err(ImpactError::ConfigError(format!(
            "project directory {} is not a directory",
            canonical.display()
        )));
    }

    Ok(canonical)
}

fn validate_revision(which: &str, rev: String) -> Result<String> {
    let rev = rev.trim().to_string();
    if rev.is_empty() {
        return Err(ImpactError::ConfigError(format!(
            "{which} revision must not be empty"
        )));
    }
    // A leading dash would be read by git as an option.
    if rev.starts_with('-') {
        return Err(ImpactError::ConfigError(format!(
            "{which} revision '{rev}' must not start with '-'"
        )));
    }
    if rev.contains("..") {
        return Err(ImpactError::ConfigError(format!(
            "{which} revision '{rev}' must be a single revision, not a range"
        )));
    }
    Ok(rev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_range_from_trimmed_revisions() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = RunConfig::new(dir.path(), " main ", "feature", ConfigFile::default()).unwrap();
        assert_eq!(cfg.revision_range(), "main..feature");
        assert!(cfg.project_dir().is_absolute());
    }

    #[test]
    fn rejects_option_like_and_range_revisions() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RunConfig::new(dir.path(), "--output=x", "main", ConfigFile::default()).is_err());
        assert!(RunConfig::new(dir.path(), "a..b", "main", ConfigFile::default()).is_err());
        assert!(RunConfig::new(dir.path(), "main", "", ConfigFile::default()).is_err());
    }

    #[test]
    fn rejects_missing_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = RunConfig::new(&missing, "a", "b", ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ImpactError::ConfigError(_)));
    }
}
