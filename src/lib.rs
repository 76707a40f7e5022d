// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod gradle;
pub mod graph;
pub mod logging;
pub mod output;
pub mod types;
pub mod vcs;

use std::future::Future;
use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{RunConfig, resolve_config, resolve_project_dir};
use crate::engine::{Orchestrator, recover};
use crate::errors::{ImpactError, Result};
use crate::gradle::GradleWrapper;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project dir + config resolution
/// - `--recover` / `--dry-run` short-cuts
/// - the orchestrator with the real Gradle wrapper
/// - Ctrl-C handling (dropping the run restores the build file)
///
/// Returns the rendered report for stdout.
pub async fn run(args: CliArgs) -> Result<String> {
    let project_dir = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let project_dir = resolve_project_dir(&project_dir)?;
    let settings = resolve_config(args.config.as_deref(), &project_dir)?;

    if args.recover {
        let actions = recover(&project_dir, &settings.gradle)?;
        let mut out = format!("recovered {} item(s)\n", actions.len());
        for action in actions {
            out.push_str(&format!("  {action}\n"));
        }
        return Ok(out);
    }

    // clap enforces both unless --recover.
    let (Some(base), Some(target)) = (args.base.clone(), args.target.clone()) else {
        return Err(ImpactError::ConfigError(
            "--base and --target are required".to_string(),
        ));
    };

    let launcher = settings.gradle.launcher.clone();
    let config = RunConfig::new(&project_dir, base, target, settings)?;

    if args.dry_run {
        return Ok(output::render_plan(&config));
    }

    info!(
        project_dir = %config.project_dir().display(),
        range = %config.revision_range(),
        "starting run"
    );

    let orchestrator = Orchestrator::new(config, GradleWrapper::new(launcher))?;
    let work = async {
        if args.changed_only {
            orchestrator.run_changes_only().await
        } else {
            orchestrator.run().await
        }
    };

    let report = until_interrupted(work, tokio::signal::ctrl_c()).await?;

    output::render(&report, args.format)
}

/// Await `work` unless `signal` fires first.
///
/// A signal listener that fails to install never fires; the run carries on
/// without Ctrl-C handling.
async fn until_interrupted<T, W, S>(work: W, signal: S) -> Result<T>
where
    W: Future<Output = Result<T>>,
    S: Future<Output = io::Result<()>>,
{
    let interrupted = async {
        if let Err(e) = signal.await {
            warn!(error = %e, "failed to listen for Ctrl+C; interruption disabled");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        outcome = work => outcome,
        () = interrupted => Err(ImpactError::Interrupted),
    }
}
