// src/gradle/inject.rs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::errors::{ImpactError, Result};
use crate::gradle::BuildDialect;

/// Append one line applying `sidecar` to the primary build file.
///
/// The file is opened in append mode; nothing is truncated. Undoing this is
/// the job of the backup guard, never of a second write. Running it twice
/// adds the line twice.
pub fn inject(dir: &Path, dialect: BuildDialect, sidecar: &str) -> Result<()> {
    let path = dir.join(dialect.file_name());
    let line = injected_text(&path, dialect, sidecar)?;

    let mut file = OpenOptions::new().append(true).open(&path).map_err(|e| {
        ImpactError::InjectionError(format!("opening {} for append: {e}", path.display()))
    })?;

    file.write_all(line.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| ImpactError::InjectionError(format!("appending to {}: {e}", path.display())))?;

    debug!(path = %path.display(), %dialect, statement = %line.trim(), "injected sidecar apply");
    Ok(())
}

/// Text to append so the statement lands on a line of its own.
fn injected_text(path: &Path, dialect: BuildDialect, sidecar: &str) -> Result<String> {
    let current = fs::read(path).map_err(|e| {
        ImpactError::InjectionError(format!("reading {}: {e}", path.display()))
    })?;

    let separator = if current.is_empty() || current.ends_with(b"\n") {
        ""
    } else {
        "\n"
    };
    Ok(format!("{separator}{}\n", dialect.apply_statement(sidecar)))
}
