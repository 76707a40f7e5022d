// src/gradle/sidecar.rs

//! The Groovy script plugin applied to the build to dump the project graph.
//!
//! Wire format written by the task, one row per subproject, no header:
//!
//! ```text
//! "<name>","<projectDir path>","<comma-joined dependent names>"
//! ```
//!
//! `ProjectDependency.dependencyProject` and the configuration names are
//! Gradle internals that may move between Gradle versions. Configuration
//! names are configurable; nothing else is.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::config::GradleSection;
use crate::errors::{ImpactError, Result};

/// First line of every generated sidecar; marks files that are safe to replace.
pub const GENERATED_MARKER: &str = "// Generated by gradle-impact. Removed again after the run.";

const TEMPLATE: &str = r#"// Generated by gradle-impact. Removed again after the run.
import org.gradle.api.artifacts.ProjectDependency

tasks.register("@TASK@") {
    doLast {
        def outputPath = project.findProperty("@PROPERTY@")
        if (outputPath == null) {
            throw new GradleException("missing -P@PROPERTY@=<path>")
        }
        def configurationNames = [@CONFIGURATIONS@]
        new File(outputPath.toString()).withWriter("UTF-8") { writer ->
            rootProject.subprojects.each { currentProject ->
                def dependents = rootProject.subprojects.findAll { candidate ->
                    candidate != currentProject && configurationNames.any { configurationName ->
                        def configuration = candidate.configurations.findByName(configurationName)
                        configuration != null && configuration.dependencies.any { dependency ->
                            dependency instanceof ProjectDependency && dependency.dependencyProject == currentProject
                        }
                    }
                }.collect { it.name }.join(",")
                writer << "\"${currentProject.name}\",\"${currentProject.projectDir.path}\",\"${dependents}\"\n"
            }
        }
    }
}
"#;

/// Render the task definition for the given settings.
///
/// Names are validated as plain identifiers when the config is loaded, so
/// they can be spliced into the script without escaping.
pub fn render_task(settings: &GradleSection) -> String {
    let configurations = settings
        .configurations
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    TEMPLATE
        .replace("@TASK@", &settings.task_name)
        .replace("@PROPERTY@", &settings.output_property)
        .replace("@CONFIGURATIONS@", &configurations)
}

/// Create `dir/<sidecar_file>` holding the reporting task.
///
/// The file is flushed and synced before returning so the build never sees
/// a partial script.
pub fn write_sidecar_task(dir: &Path, settings: &GradleSection) -> Result<()> {
    let path = dir.join(&settings.sidecar_file);
    let script = render_task(settings);

    let write = || -> std::io::Result<()> {
        let mut file = File::create(&path)?;
        file.write_all(script.as_bytes())?;
        file.sync_all()
    };

    write().map_err(|e| {
        ImpactError::SidecarWriteError(format!("writing {}: {e}", path.display()))
    })?;

    debug!(path = %path.display(), task = %settings.task_name, "wrote sidecar task");
    Ok(())
}

/// Whether `path` holds a sidecar written by us (e.g. left by a killed run).
pub fn is_generated(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|s| s.starts_with(GENERATED_MARKER))
        .unwrap_or(false)
}
