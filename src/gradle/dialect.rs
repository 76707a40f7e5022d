// src/gradle/dialect.rs

use std::fmt;
use std::path::Path;

use tracing::debug;

/// Syntax of the project's primary build script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDialect {
    /// `build.gradle`
    Groovy,
    /// `build.gradle.kts`
    Kotlin,
}

impl BuildDialect {
    /// Detection priority: the first existing file wins.
    pub const PROBE_ORDER: [BuildDialect; 2] = [BuildDialect::Groovy, BuildDialect::Kotlin];

    pub fn file_name(self) -> &'static str {
        match self {
            BuildDialect::Groovy => "build.gradle",
            BuildDialect::Kotlin => "build.gradle.kts",
        }
    }

    pub fn backup_file_name(self) -> String {
        format!("{}.bak", self.file_name())
    }

    /// Statement that applies a script plugin from `sidecar`.
    ///
    /// The sidecar is always a Groovy script; Kotlin build files can apply
    /// it all the same.
    pub fn apply_statement(self, sidecar: &str) -> String {
        match self {
            BuildDialect::Groovy => format!("apply from: '{sidecar}'"),
            BuildDialect::Kotlin => format!("apply(from = \"{sidecar}\")"),
        }
    }
}

impl fmt::Display for BuildDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildDialect::Groovy => write!(f, "groovy"),
            BuildDialect::Kotlin => write!(f, "kotlin"),
        }
    }
}

/// Find the primary build script in `dir`.
pub fn detect(dir: &Path) -> Option<BuildDialect> {
    let found = BuildDialect::PROBE_ORDER
        .into_iter()
        .find(|dialect| dir.join(dialect.file_name()).is_file());

    debug!(dir = %dir.display(), dialect = ?found, "probed for build script");
    found
}
