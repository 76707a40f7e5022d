// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ImpactError, Result};

/// File name looked up in the project directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "gradle-impact.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ImpactError::ConfigError(format!("reading config file {}: {e}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location for a project.
pub fn default_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(DEFAULT_CONFIG_FILE)
}

/// Resolve the effective configuration.
///
/// - An explicit path must exist and be valid.
/// - Otherwise `<project>/gradle-impact.toml` is used when present.
/// - Otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>, project_dir: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading explicit config");
        return load_and_validate(path);
    }

    let candidate = default_config_path(project_dir);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "loading project config");
        return load_and_validate(candidate);
    }

    debug!("no config file; using defaults");
    Ok(ConfigFile::default())
}
