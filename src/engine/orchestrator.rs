// src/engine/orchestrator.rs

//! Sequencing of one run.
//!
//! Module discovery nests three scopes, released innermost-first:
//!
//! ```text
//! BuildFileGuard (restore build file)
//!   TempArtifact sidecar
//!     TempArtifact report
//!       write sidecar -> inject -> run gradle -> parse report
//! ```
//!
//! Every release runs even when the body or an earlier release failed. The
//! body's error wins; release failures are attached to it.

use std::path::Path;

use tracing::{error, info};

use crate::config::RunConfig;
use crate::engine::state::{RunState, StateTracker};
use crate::errors::{ImpactError, Result, merge_cleanup};
use crate::fs::{TempArtifact, remove_if_exists};
use crate::gradle::sidecar::is_generated;
use crate::gradle::{
    BuildDialect, BuildFileGuard, BuildInvocation, BuildRunner, detect, inject, parse,
    write_sidecar_task,
};
use crate::graph::ModuleGraph;
use crate::types::{ImpactReport, Module};
use crate::vcs::{ChangeFilter, changed_files};

pub struct Orchestrator<R: BuildRunner> {
    config: RunConfig,
    runner: R,
    filter: ChangeFilter,
}

impl<R: BuildRunner> Orchestrator<R> {
    pub fn new(config: RunConfig, runner: R) -> Result<Self> {
        let filter = ChangeFilter::new(&config.settings().changes.exclude)?;
        Ok(Self {
            config,
            runner,
            filter,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Files changed between the configured revisions.
    pub async fn changed_files(&self) -> Result<Vec<String>> {
        changed_files(
            &self.config.settings().git.program,
            self.config.project_dir(),
            self.config.base(),
            self.config.target(),
        )
        .await
    }

    /// Changed files only; Gradle is not run.
    pub async fn run_changes_only(&self) -> Result<ImpactReport> {
        let changed = self.changed_files().await?;
        let (_, ignored) = self.filter.partition(&changed);

        Ok(ImpactReport {
            base: self.config.base().to_string(),
            target: self.config.target().to_string(),
            changed_files: changed,
            ignored_files: ignored,
            ..ImpactReport::default()
        })
    }

    /// Changed files, module graph, and the modules they affect.
    ///
    /// The diff runs first: it is read-only, so a bad revision fails the run
    /// before the build file is touched.
    pub async fn run(&self) -> Result<ImpactReport> {
        let changed = self.changed_files().await?;
        let (kept, ignored) = self.filter.partition(&changed);

        let modules = self.discover_modules().await?;
        let graph = ModuleGraph::from_modules(self.config.project_dir(), &modules);
        let (owned, unowned) = graph.owners(&kept);
        let affected = graph.affected_by(owned.iter().map(String::as_str));

        info!(
            changed = changed.len(),
            ignored = ignored.len(),
            modules = modules.len(),
            affected = affected.len(),
            "impact analysis complete"
        );

        Ok(ImpactReport {
            base: self.config.base().to_string(),
            target: self.config.target().to_string(),
            unowned_files: unowned.into_iter().cloned().collect(),
            changed_files: changed,
            ignored_files: ignored,
            modules,
            affected_modules: affected,
        })
    }

    /// Ask Gradle for its subprojects and their dependents.
    ///
    /// On success and on failure alike the build file is byte-identical
    /// afterwards and no sidecar or report file is left behind.
    pub async fn discover_modules(&self) -> Result<Vec<Module>> {
        let mut state = StateTracker::new();
        let result = self.discover_with_state(&mut state).await;

        match &result {
            Ok(modules) => {
                state.advance(RunState::Done);
                info!(modules = modules.len(), "module discovery finished");
            }
            Err(e) => {
                error!(state = %state.current(), error = %e, "module discovery failed");
            }
        }
        result
    }

    async fn discover_with_state(&self, state: &mut StateTracker) -> Result<Vec<Module>> {
        let dir = self.config.project_dir();

        let dialect =
            detect(dir).ok_or_else(|| ImpactError::DialectNotFound(dir.to_path_buf()))?;
        state.advance(RunState::DialectDetected);
        info!(%dialect, build_file = dialect.file_name(), "detected build script");

        let guard = BuildFileGuard::acquire(dir, dialect.file_name())?;
        state.advance(RunState::BackedUp);

        let outcome = self.with_temporary_artifacts(dir, dialect, state).await;
        merge_cleanup(outcome, vec![guard.restore()])
    }

    async fn with_temporary_artifacts(
        &self,
        dir: &Path,
        dialect: BuildDialect,
        state: &mut StateTracker,
    ) -> Result<Vec<Module>> {
        let gradle = &self.config.settings().gradle;
        let sidecar_path = dir.join(&gradle.sidecar_file);

        // Never delete a file we did not write.
        if sidecar_path.exists() && !is_generated(&sidecar_path) {
            return Err(ImpactError::SidecarWriteError(format!(
                "{} already exists and was not generated by gradle-impact",
                sidecar_path.display()
            )));
        }

        let sidecar = TempArtifact::track(sidecar_path);
        let report = TempArtifact::track(dir.join(&gradle.report_file));

        let outcome = self
            .generate_and_read(dir, dialect, report.path(), state)
            .await;
        merge_cleanup(outcome, vec![report.release(), sidecar.release()])
    }

    async fn generate_and_read(
        &self,
        dir: &Path,
        dialect: BuildDialect,
        report_path: &Path,
        state: &mut StateTracker,
    ) -> Result<Vec<Module>> {
        let gradle = &self.config.settings().gradle;

        write_sidecar_task(dir, gradle)?;
        state.advance(RunState::SidecarWritten);

        inject(dir, dialect, &gradle.sidecar_file)?;
        state.advance(RunState::Injected);

        // A report left by an earlier run must not pass for this one.
        remove_if_exists(report_path).map_err(|e| {
            ImpactError::CleanupError(format!("removing stale {}: {e}", report_path.display()))
        })?;

        let invocation = BuildInvocation {
            project_dir: dir.to_path_buf(),
            task_name: gradle.task_name.clone(),
            output_property: gradle.output_property.clone(),
            output_path: report_path.to_path_buf(),
            extra_args: gradle.extra_args.clone(),
        };
        self.runner.run(&invocation).await?;
        state.advance(RunState::BuildRan);

        let modules = parse(report_path)?;
        state.advance(RunState::Parsed);
        Ok(modules)
    }
}
