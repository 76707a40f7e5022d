// src/config/validate.rs

use std::collections::HashSet;
use std::sync::LazyLock;

use globset::Glob;
use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ImpactError, Result};
use crate::gradle::BuildDialect;

/// Names rendered verbatim into the Groovy sidecar script.
static GRADLE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ImpactError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.git, raw.gradle, raw.changes))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_git(cfg)?;
    validate_gradle_names(cfg)?;
    validate_artifact_files(cfg)?;
    validate_excludes(cfg)?;
    Ok(())
}

fn validate_git(cfg: &RawConfigFile) -> Result<()> {
    if cfg.git.program.trim().is_empty() {
        return Err(ImpactError::ConfigError(
            "[git].program must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_gradle_names(cfg: &RawConfigFile) -> Result<()> {
    let gradle = &cfg.gradle;
    ensure_identifier("[gradle].task_name", &gradle.task_name)?;
    ensure_identifier("[gradle].output_property", &gradle.output_property)?;

    if gradle.configurations.is_empty() {
        return Err(ImpactError::ConfigError(
            "[gradle].configurations must name at least one configuration".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &gradle.configurations {
        ensure_identifier("[gradle].configurations", name)?;
        if !seen.insert(name.as_str()) {
            return Err(ImpactError::ConfigError(format!(
                "[gradle].configurations lists '{name}' more than once"
            )));
        }
    }

    if let Some(launcher) = &gradle.launcher {
        if launcher.trim().is_empty() {
            return Err(ImpactError::ConfigError(
                "[gradle].launcher must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn ensure_identifier(field: &str, value: &str) -> Result<()> {
    if GRADLE_IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(ImpactError::ConfigError(format!(
            "{field} must be a plain identifier (got '{value}')"
        )))
    }
}

fn validate_artifact_files(cfg: &RawConfigFile) -> Result<()> {
    let gradle = &cfg.gradle;
    ensure_plain_file_name("[gradle].sidecar_file", &gradle.sidecar_file)?;
    ensure_plain_file_name("[gradle].report_file", &gradle.report_file)?;

    if !gradle.sidecar_file.ends_with(".gradle") {
        return Err(ImpactError::ConfigError(format!(
            "[gradle].sidecar_file must end in .gradle (got '{}')",
            gradle.sidecar_file
        )));
    }

    if gradle.sidecar_file == gradle.report_file {
        return Err(ImpactError::ConfigError(
            "[gradle].sidecar_file and [gradle].report_file must differ".to_string(),
        ));
    }

    // Both artifacts are deleted after the run; they must never alias the
    // build file or its backup.
    for dialect in BuildDialect::PROBE_ORDER {
        let reserved = [dialect.file_name().to_string(), dialect.backup_file_name()];
        for name in [&gradle.sidecar_file, &gradle.report_file] {
            if reserved.contains(name) {
                return Err(ImpactError::ConfigError(format!(
                    "'{name}' is reserved for the project's build file"
                )));
            }
        }
    }

    Ok(())
}

fn ensure_plain_file_name(field: &str, value: &str) -> Result<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\');
    if bad {
        return Err(ImpactError::ConfigError(format!(
            "{field} must be a bare file name (got '{value}')"
        )));
    }
    Ok(())
}

fn validate_excludes(cfg: &RawConfigFile) -> Result<()> {
    for pattern in &cfg.changes.exclude {
        Glob::new(pattern).map_err(|e| {
            ImpactError::ConfigError(format!(
                "[changes].exclude has invalid glob '{pattern}': {e}"
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(toml_src: &str) -> RawConfigFile {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = ConfigFile::try_from(raw("")).unwrap();
        assert_eq!(cfg.git.program, "git");
        assert_eq!(cfg.gradle.task_name, "incremental");
        assert_eq!(cfg.gradle.sidecar_file, "incremental.gradle");
        assert_eq!(cfg.gradle.report_file, "incremental.csv");
        assert_eq!(cfg.gradle.configurations, vec!["implementation", "api"]);
        assert!(cfg.changes.exclude.is_empty());
    }

    #[test]
    fn rejects_task_name_that_would_break_the_script() {
        let err = ConfigFile::try_from(raw("[gradle]\ntask_name = \"bad name\"\n")).unwrap_err();
        match err {
            ImpactError::ConfigError(msg) => assert!(msg.contains("task_name")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_configurations() {
        let err = ConfigFile::try_from(raw(
            "[gradle]\nconfigurations = [\"api\", \"api\"]\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn rejects_artifact_aliasing_build_file() {
        let err = ConfigFile::try_from(raw("[gradle]\nreport_file = \"build.gradle.bak\"\n"))
            .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn rejects_nested_artifact_paths() {
        let err = ConfigFile::try_from(raw("[gradle]\nsidecar_file = \"gradle/x.gradle\"\n"))
            .unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn rejects_invalid_exclude_glob() {
        let err = ConfigFile::try_from(raw("[changes]\nexclude = [\"src/[\"]\n")).unwrap_err();
        assert!(err.to_string().contains("invalid glob"));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        assert!(toml::from_str::<RawConfigFile>("[gradle]\ntask = \"x\"\n").is_err());
    }
}
