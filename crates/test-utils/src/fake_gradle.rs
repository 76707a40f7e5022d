use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use gradle_impact::errors::{ImpactError, Result};
use gradle_impact::gradle::{BuildInvocation, BuildRunner};

/// What the project looked like while the fake build was running.
#[derive(Debug, Clone)]
pub struct Observation {
    pub invocation: BuildInvocation,
    /// Contents of `build.gradle` or `build.gradle.kts` during the build.
    pub build_file: String,
    pub sidecar_present: bool,
}

#[derive(Debug, Clone)]
enum Behaviour {
    /// `(name, project-relative dir, dependents)` rows, written the way the
    /// real task writes them (absolute project dirs).
    Report(Vec<(String, String, String)>),
    /// Raw report text, written verbatim.
    Raw(String),
    /// Exit non-zero without writing anything.
    Fail(i32),
}

/// A fake Gradle that:
/// - records what it saw at invocation time
/// - writes a canned report to the requested output path, or fails.
#[derive(Debug, Clone)]
pub struct FakeGradle {
    behaviour: Behaviour,
    observed: Arc<Mutex<Vec<Observation>>>,
}

impl FakeGradle {
    pub fn reporting(rows: &[(&str, &str, &str)]) -> Self {
        let rows = rows
            .iter()
            .map(|(n, p, d)| (n.to_string(), p.to_string(), d.to_string()))
            .collect();
        Self::with(Behaviour::Report(rows))
    }

    pub fn writing_raw(text: &str) -> Self {
        Self::with(Behaviour::Raw(text.to_string()))
    }

    pub fn failing(code: i32) -> Self {
        Self::with(Behaviour::Fail(code))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            observed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the observations; stays valid after the fake is
    /// moved into an orchestrator.
    pub fn observations(&self) -> Arc<Mutex<Vec<Observation>>> {
        Arc::clone(&self.observed)
    }

    fn observe(&self, invocation: &BuildInvocation) {
        let dir = &invocation.project_dir;
        let build_file = ["build.gradle", "build.gradle.kts"]
            .iter()
            .find_map(|name| fs::read_to_string(dir.join(name)).ok())
            .unwrap_or_default();
        let sidecar_present = sidecar_candidates(dir).next().is_some();

        self.observed.lock().unwrap().push(Observation {
            invocation: invocation.clone(),
            build_file,
            sidecar_present,
        });
    }

    fn respond(&self, invocation: &BuildInvocation) -> Result<()> {
        let dir = &invocation.project_dir;
        match &self.behaviour {
            Behaviour::Report(rows) => {
                let mut text = String::new();
                for (name, rel, dependents) in rows {
                    text.push_str(&format!(
                        "\"{name}\",\"{}\",\"{dependents}\"\n",
                        dir.join(rel).display()
                    ));
                }
                fs::write(&invocation.output_path, text)?;
                Ok(())
            }
            Behaviour::Raw(text) => {
                fs::write(&invocation.output_path, text)?;
                Ok(())
            }
            Behaviour::Fail(code) => Err(ImpactError::BuildInvocationError(format!(
                "fake gradle exited with code {code}"
            ))),
        }
    }
}

impl BuildRunner for FakeGradle {
    fn run<'a>(
        &'a self,
        invocation: &'a BuildInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.observe(invocation);
            self.respond(invocation)
        })
    }
}

fn sidecar_candidates(dir: &Path) -> impl Iterator<Item = std::path::PathBuf> {
    fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "gradle")
                && p.file_name().is_some_and(|n| n != "build.gradle" && n != "settings.gradle")
        })
}
