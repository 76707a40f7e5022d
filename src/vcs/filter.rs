// src/vcs/filter.rs

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{ImpactError, Result};

/// Exclude patterns from `[changes].exclude`.
///
/// Patterns match repository-relative paths with forward slashes, e.g.
/// `**/*.md` or `docs/**`.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    excludes: GlobSet,
    patterns: Vec<String>,
}

impl ChangeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                ImpactError::ConfigError(format!("invalid exclude glob '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }
        let excludes = builder
            .build()
            .map_err(|e| ImpactError::ConfigError(format!("building exclude set: {e}")))?;

        Ok(Self {
            excludes,
            patterns: patterns.to_vec(),
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excludes.is_match(path)
    }

    /// Split into `(kept, ignored)`, preserving order in both.
    pub fn partition(&self, files: &[String]) -> (Vec<String>, Vec<String>) {
        files.iter().cloned().partition(|f| !self.is_excluded(f))
    }
}
