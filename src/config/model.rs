// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [git]
/// program = "git"
///
/// [gradle]
/// task_name = "incremental"
/// sidecar_file = "incremental.gradle"
/// report_file = "incremental.csv"
/// output_property = "incrementalOutput"
/// configurations = ["implementation", "api"]
///
/// [changes]
/// exclude = ["**/*.md"]
/// ```
///
/// All sections are optional and have defaults. This is the unvalidated
/// shape; convert with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub git: GitSection,

    #[serde(default)]
    pub gradle: GradleSection,

    #[serde(default)]
    pub changes: ChangesSection,
}

/// Validated configuration. Only constructed through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub git: GitSection,
    pub gradle: GradleSection,
    pub changes: ChangesSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        git: GitSection,
        gradle: GradleSection,
        changes: ChangesSection,
    ) -> Self {
        Self {
            git,
            gradle,
            changes,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.git, raw.gradle, raw.changes)
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSection {
    /// Program used for `diff --name-only`.
    #[serde(default = "default_git_program")]
    pub program: String,
}

fn default_git_program() -> String {
    "git".to_string()
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            program: default_git_program(),
        }
    }
}

/// `[gradle]` section: names used by the injected reporting task.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradleSection {
    /// Name of the synthetic task.
    #[serde(default = "default_task_name")]
    pub task_name: String,

    /// File name of the sidecar script, created next to the build file.
    #[serde(default = "default_sidecar_file")]
    pub sidecar_file: String,

    /// File name of the CSV report, created in the project directory.
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Project property carrying the report path (`-P<name>=<path>`).
    #[serde(default = "default_output_property")]
    pub output_property: String,

    /// Dependency configurations inspected for project dependencies.
    #[serde(default = "default_configurations")]
    pub configurations: Vec<String>,

    /// Launcher override. If `None`, `gradlew.bat` on Windows and `gradlew`
    /// elsewhere.
    #[serde(default)]
    pub launcher: Option<String>,

    /// Extra arguments appended to the Gradle command line.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_task_name() -> String {
    "incremental".to_string()
}

fn default_sidecar_file() -> String {
    "incremental.gradle".to_string()
}

fn default_report_file() -> String {
    "incremental.csv".to_string()
}

fn default_output_property() -> String {
    "incrementalOutput".to_string()
}

fn default_configurations() -> Vec<String> {
    vec!["implementation".to_string(), "api".to_string()]
}

impl Default for GradleSection {
    fn default() -> Self {
        Self {
            task_name: default_task_name(),
            sidecar_file: default_sidecar_file(),
            report_file: default_report_file(),
            output_property: default_output_property(),
            configurations: default_configurations(),
            launcher: None,
            extra_args: Vec::new(),
        }
    }
}

/// `[changes]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangesSection {
    /// Glob patterns; matching changed files are ignored for impact analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}
