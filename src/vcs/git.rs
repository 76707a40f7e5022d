// src/vcs/git.rs

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{ImpactError, Result};

/// Paths that differ between `base` and `target`, in git's output order.
///
/// Runs `<program> diff --name-only <base>..<target>` inside `dir`.
pub async fn changed_files(program: &str, dir: &Path, base: &str, target: &str) -> Result<Vec<String>> {
    let range = format!("{base}..{target}");
    debug!(program, dir = %dir.display(), %range, "running git diff");

    let output = Command::new(program)
        .args(["diff", "--name-only", &range])
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ImpactError::DiffError(format!("starting {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ImpactError::DiffError(format!(
            "{program} diff --name-only {range} exited with code {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files = parse_name_only(&stdout);
    info!(%range, count = files.len(), "collected changed files");
    Ok(files)
}

/// Split `--name-only` output into paths, dropping the trailing empty line.
pub fn parse_name_only(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
