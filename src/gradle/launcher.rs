// src/gradle/launcher.rs

//! Running the Gradle wrapper.
//!
//! The orchestrator talks to a [`BuildRunner`] instead of spawning processes
//! itself, so tests can swap in a fake that writes a report directly.
//! [`GradleWrapper`] is the production implementation.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{ImpactError, Result};

/// One invocation of the reporting task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    pub project_dir: PathBuf,
    pub task_name: String,
    pub output_property: String,
    pub output_path: PathBuf,
    pub extra_args: Vec<String>,
}

impl BuildInvocation {
    /// Command-line arguments after the launcher.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.task_name.clone(),
            format!("-P{}={}", self.output_property, self.output_path.display()),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Trait abstracting how the build tool is run.
pub trait BuildRunner: Send + Sync {
    /// Run the task to completion. A non-zero exit is an error.
    fn run<'a>(
        &'a self,
        invocation: &'a BuildInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Wrapper script name for the current platform.
pub fn default_launcher_name() -> &'static str {
    if cfg!(windows) { "gradlew.bat" } else { "gradlew" }
}

/// Runs `<project>/gradlew` (or `gradlew.bat`).
#[derive(Debug, Clone, Default)]
pub struct GradleWrapper {
    launcher: Option<String>,
}

impl GradleWrapper {
    pub fn new(launcher: Option<String>) -> Self {
        Self { launcher }
    }

    pub fn launcher_path(&self, project_dir: &Path) -> PathBuf {
        let name = self.launcher.as_deref().unwrap_or(default_launcher_name());
        project_dir.join(name)
    }

    async fn run_inner(&self, invocation: &BuildInvocation) -> Result<()> {
        let launcher = self.launcher_path(&invocation.project_dir);
        if !launcher.is_file() {
            return Err(ImpactError::BuildInvocationError(format!(
                "launcher {} not found",
                launcher.display()
            )));
        }

        let args = invocation.args();
        info!(launcher = %launcher.display(), ?args, "starting gradle");

        let mut child = Command::new(&launcher)
            .args(&args)
            .current_dir(&invocation.project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ImpactError::BuildInvocationError(format!(
                    "starting {}: {e}",
                    launcher.display()
                ))
            })?;

        // Drain both pipes so gradle never blocks on a full buffer.
        let stdout = child.stdout.take().map(|s| tokio::spawn(forward_lines("stdout", s)));
        let stderr = child.stderr.take().map(|s| tokio::spawn(forward_lines("stderr", s)));

        let status = child.wait().await.map_err(|e| {
            ImpactError::BuildInvocationError(format!("waiting for {}: {e}", launcher.display()))
        })?;

        for handle in [stdout, stderr].into_iter().flatten() {
            let _ = handle.await;
        }

        let code = status.code().unwrap_or(-1);
        info!(exit_code = code, success = status.success(), "gradle exited");

        if !status.success() {
            return Err(ImpactError::BuildInvocationError(format!(
                "{} {} exited with code {code}",
                launcher.display(),
                invocation.task_name
            )));
        }
        Ok(())
    }
}

impl BuildRunner for GradleWrapper {
    fn run<'a>(
        &'a self,
        invocation: &'a BuildInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.run_inner(invocation))
    }
}

/// Log every line of `reader` until EOF and return how many were seen.
///
/// Gradle output is not guaranteed to be UTF-8; lines are decoded lossily so
/// the pipe is always drained to the end.
async fn forward_lines<R>(stream: &'static str, reader: R) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                count += 1;
                let line = String::from_utf8_lossy(&buf);
                debug!(stream, "gradle: {}", line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                debug!(stream, error = %e, "stopped reading gradle output");
                break;
            }
        }
    }
    count
}
