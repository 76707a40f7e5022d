// src/config/mod.rs

//! Configuration loading and validation for gradle-impact.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate names that end up in generated Gradle code (`validate.rs`).
//! - Merge CLI inputs into one checked `RunConfig` (`run.rs`).

pub mod loader;
pub mod model;
pub mod run;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{ChangesSection, ConfigFile, GitSection, GradleSection, RawConfigFile};
pub use run::{RunConfig, resolve_project_dir};
