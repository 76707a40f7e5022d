// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every step of a run surfaces one of these to the orchestrator. Nothing is
//! retried; the first error aborts the run. Cleanup failures never replace
//! an earlier error, they are attached to it via
//! [`ImpactError::WithCleanupFailures`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImpactError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Revision diff failed: {0}")]
    DiffError(String),

    #[error("No build.gradle or build.gradle.kts found in {}", .0.display())]
    DialectNotFound(PathBuf),

    #[error("Build file backup failed: {0}")]
    BackupError(String),

    #[error("Build file injection failed: {0}")]
    InjectionError(String),

    #[error("Writing sidecar task failed: {0}")]
    SidecarWriteError(String),

    #[error("Gradle invocation failed: {0}")]
    BuildInvocationError(String),

    #[error("Dependency report is unreadable: {0}")]
    ReportParseError(String),

    #[error("Build file restore failed: {0}")]
    RestoreError(String),

    #[error("Removing temporary artifact failed: {0}")]
    CleanupError(String),

    #[error("Interrupted; build file restored")]
    Interrupted,

    #[error("{primary} (cleanup also failed: {})", join_messages(.cleanup))]
    WithCleanupFailures {
        primary: Box<ImpactError>,
        cleanup: Vec<ImpactError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImpactError {
    /// The error that decided the outcome of the run.
    ///
    /// For [`ImpactError::WithCleanupFailures`] this is the step failure, not
    /// the cleanup failure that followed it.
    pub fn primary(&self) -> &ImpactError {
        match self {
            ImpactError::WithCleanupFailures { primary, .. } => primary.primary(),
            other => other,
        }
    }

    /// Cleanup failures attached to this error, if any.
    pub fn cleanup_failures(&self) -> &[ImpactError] {
        match self {
            ImpactError::WithCleanupFailures { cleanup, .. } => cleanup,
            _ => &[],
        }
    }
}

/// Combine the outcome of a scoped body with the results of its releases.
///
/// - body ok, releases ok: the body's value
/// - body ok, a release failed: the first release error, the rest attached
/// - body failed: the body's error, with any release errors attached
pub fn merge_cleanup<T>(outcome: Result<T>, releases: Vec<Result<()>>) -> Result<T> {
    let mut failures: Vec<ImpactError> = releases.into_iter().filter_map(|r| r.err()).collect();

    match outcome {
        Ok(value) if failures.is_empty() => Ok(value),
        Ok(_) => {
            let primary = failures.remove(0);
            Err(attach(primary, failures))
        }
        Err(primary) => Err(attach(primary, failures)),
    }
}

fn attach(primary: ImpactError, mut cleanup: Vec<ImpactError>) -> ImpactError {
    if cleanup.is_empty() {
        return primary;
    }
    match primary {
        ImpactError::WithCleanupFailures {
            primary,
            cleanup: mut earlier,
        } => {
            earlier.append(&mut cleanup);
            ImpactError::WithCleanupFailures {
                primary,
                cleanup: earlier,
            }
        }
        primary => ImpactError::WithCleanupFailures {
            primary: Box::new(primary),
            cleanup,
        },
    }
}

fn join_messages(errors: &[ImpactError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ImpactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_error_takes_precedence_over_restore_error() {
        let outcome: Result<()> = Err(ImpactError::BuildInvocationError("exit 1".into()));
        let merged = merge_cleanup(
            outcome,
            vec![Err(ImpactError::RestoreError("rename failed".into())), Ok(())],
        );

        let err = merged.unwrap_err();
        assert!(matches!(err.primary(), ImpactError::BuildInvocationError(_)));
        assert_eq!(err.cleanup_failures().len(), 1);
        let msg = err.to_string();
        assert!(msg.starts_with("Gradle invocation failed: exit 1"));
        assert!(msg.contains("rename failed"));
    }

    #[test]
    fn release_error_fails_a_successful_body() {
        let merged = merge_cleanup(
            Ok(42),
            vec![
                Err(ImpactError::RestoreError("missing backup".into())),
                Err(ImpactError::CleanupError("busy".into())),
            ],
        );

        let err = merged.unwrap_err();
        assert!(matches!(err.primary(), ImpactError::RestoreError(_)));
        assert_eq!(err.cleanup_failures().len(), 1);
    }

    #[test]
    fn nested_cleanup_failures_are_flattened() {
        let inner = merge_cleanup::<()>(
            Err(ImpactError::ReportParseError("row 2".into())),
            vec![Err(ImpactError::CleanupError("sidecar".into()))],
        );
        let outer = merge_cleanup(inner, vec![Err(ImpactError::RestoreError("bak".into()))]);

        let err = outer.unwrap_err();
        assert!(matches!(err.primary(), ImpactError::ReportParseError(_)));
        assert_eq!(err.cleanup_failures().len(), 2);
    }

    #[test]
    fn clean_releases_pass_value_through() {
        assert_eq!(merge_cleanup(Ok("ok"), vec![Ok(()), Ok(())]).unwrap(), "ok");
    }
}
