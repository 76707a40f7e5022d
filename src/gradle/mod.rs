// src/gradle/mod.rs

//! Everything that touches the Gradle project on disk or runs Gradle.
//!
//! - [`dialect`] finds the primary build script.
//! - [`backup`] saves and restores it around the mutation.
//! - [`sidecar`] writes the reporting task; [`inject`] applies it.
//! - [`launcher`] runs the wrapper; [`report`] reads what the task wrote.

pub mod backup;
pub mod dialect;
pub mod inject;
pub mod launcher;
pub mod report;
pub mod sidecar;

pub use backup::{BuildFileGuard, backup, restore};
pub use dialect::{BuildDialect, detect};
pub use inject::inject;
pub use launcher::{BuildInvocation, BuildRunner, GradleWrapper};
pub use report::parse;
pub use sidecar::write_sidecar_task;
