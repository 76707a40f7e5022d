use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use gradle_impact::config::{ConfigFile, RunConfig};
use tempfile::TempDir;

pub const GROOVY_BUILD: &str = "plugins {\n    id 'java'\n}\n\nallprojects {\n    repositories { mavenCentral() }\n}\n";
pub const KOTLIN_BUILD: &str = "plugins {\n    java\n}\n\nallprojects {\n    repositories { mavenCentral() }\n}\n";

/// A throwaway multi-project Gradle layout:
///
/// ```text
/// <tmp>/
///   build.gradle | build.gradle.kts
///   settings.gradle
///   core/src/main/java/Core.java
///   app/src/main/java/App.java
/// ```
pub struct GradleProject {
    dir: TempDir,
    build_file: Option<&'static str>,
}

impl GradleProject {
    pub fn groovy() -> Self {
        Self::with_build_file("build.gradle", GROOVY_BUILD)
    }

    pub fn kotlin() -> Self {
        Self::with_build_file("build.gradle.kts", KOTLIN_BUILD)
    }

    /// Subprojects but no root build script.
    pub fn without_build_file() -> Self {
        let project = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            build_file: None,
        };
        project.write_layout();
        project
    }

    fn with_build_file(name: &'static str, content: &str) -> Self {
        let project = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            build_file: Some(name),
        };
        project.write_layout();
        project.write(name, content);
        project
    }

    fn write_layout(&self) {
        self.write("settings.gradle", "include 'core', 'app'\n");
        self.write("core/src/main/java/Core.java", "class Core {}\n");
        self.write("app/src/main/java/App.java", "class App {}\n");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the root build script.
    pub fn build_file(&self) -> PathBuf {
        let name = self.build_file.expect("fixture has no build file");
        self.path().join(name)
    }

    pub fn build_file_bytes(&self) -> Vec<u8> {
        fs::read(self.build_file()).expect("read build file")
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture file");
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }

    /// Names of every entry in the project root, sorted.
    pub fn root_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("read project dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn run_config(&self, base: &str, target: &str) -> RunConfig {
        self.run_config_with(base, target, ConfigFile::default())
    }

    pub fn run_config_with(&self, base: &str, target: &str, settings: ConfigFile) -> RunConfig {
        RunConfig::new(self.path(), base, target, settings).expect("valid run config")
    }

    /// Turn the fixture into a git repository with two branches:
    /// `main` (the layout as written) and `feature` (one commit on top that
    /// touches `core`).
    pub fn init_git_history(&self) {
        self.git(&["init", "--quiet"]);
        self.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "-m", "initial"]);
        self.git(&["checkout", "--quiet", "-b", "feature"]);
        self.write("core/src/main/java/Core.java", "class Core { int x; }\n");
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "-m", "touch core"]);
    }

    fn git(&self, args: &[&str]) {
        let status = Command::new("git")
            .args([
                "-c",
                "user.name=Fixture",
                "-c",
                "user.email=fixture@example.invalid",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .status()
            .expect("spawn git");
        assert!(status.success(), "git {args:?} failed");
    }
}

/// True if a `git` binary can be run.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Install an executable `gradlew` script in `dir`.
#[cfg(unix)]
pub fn install_launcher(dir: &Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("gradlew");
    fs::write(&path, script).expect("write launcher");
    let mut perms = fs::metadata(&path).expect("launcher metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod launcher");
}
