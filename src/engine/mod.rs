// src/engine/mod.rs

//! Run orchestration.
//!
//! - [`orchestrator`] sequences diff, backup, injection, build and parse.
//! - [`state`] names the steps so failures can say how far a run got.
//! - [`recover`] cleans up after a run that was killed mid-way.

pub mod orchestrator;
pub mod recover;
pub mod state;

pub use orchestrator::Orchestrator;
pub use recover::{RecoveryAction, recover};
pub use state::{RunState, StateTracker};
