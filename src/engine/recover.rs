// src/engine/recover.rs

//! Cleanup after a run that was killed before it could restore.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::config::GradleSection;
use crate::errors::{ImpactError, Result};
use crate::fs::remove_if_exists;
use crate::gradle::backup::has_backup;
use crate::gradle::sidecar::is_generated;
use crate::gradle::{BuildDialect, restore};

/// One thing `recover` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    RestoredBuildFile(String),
    RemovedSidecar(String),
    RemovedReport(String),
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryAction::RestoredBuildFile(name) => write!(f, "restored {name} from {name}.bak"),
            RecoveryAction::RemovedSidecar(name) => write!(f, "removed leftover sidecar {name}"),
            RecoveryAction::RemovedReport(name) => write!(f, "removed leftover report {name}"),
        }
    }
}

/// Restore any `.bak` build file and remove our leftover artifacts.
///
/// A sidecar is only removed if it carries the generated marker.
pub fn recover(dir: &Path, gradle: &GradleSection) -> Result<Vec<RecoveryAction>> {
    let mut actions = Vec::new();

    for dialect in BuildDialect::PROBE_ORDER {
        let name = dialect.file_name();
        if has_backup(dir, name) {
            restore(dir, name)?;
            info!(build_file = name, "restored build file from backup");
            actions.push(RecoveryAction::RestoredBuildFile(name.to_string()));
        }
    }

    let sidecar = dir.join(&gradle.sidecar_file);
    if is_generated(&sidecar) {
        remove(&sidecar)?;
        actions.push(RecoveryAction::RemovedSidecar(gradle.sidecar_file.clone()));
    } else if sidecar.exists() {
        warn!(path = %sidecar.display(), "leaving sidecar-named file that we did not generate");
    }

    let report = dir.join(&gradle.report_file);
    if report.is_file() {
        remove(&report)?;
        actions.push(RecoveryAction::RemovedReport(gradle.report_file.clone()));
    }

    if actions.is_empty() {
        info!(dir = %dir.display(), "nothing to recover");
    }
    Ok(actions)
}

fn remove(path: &Path) -> Result<()> {
    remove_if_exists(path)
        .map(|_| ())
        .map_err(|e| ImpactError::CleanupError(format!("removing {}: {e}", path.display())))
}
