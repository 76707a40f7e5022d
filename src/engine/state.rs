// src/engine/state.rs

use std::fmt;

use tracing::debug;

/// Progress of module discovery.
///
/// `Start → DialectDetected → BackedUp → SidecarWritten → Injected →
/// BuildRan → Parsed → Done`. There are no retries and no backward edges;
/// any failure ends the run in `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Start,
    DialectDetected,
    BackedUp,
    SidecarWritten,
    Injected,
    BuildRan,
    Parsed,
    Done,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Start => "start",
            RunState::DialectDetected => "dialect-detected",
            RunState::BackedUp => "backed-up",
            RunState::SidecarWritten => "sidecar-written",
            RunState::Injected => "injected",
            RunState::BuildRan => "build-ran",
            RunState::Parsed => "parsed",
            RunState::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records how far a run got, for diagnostics on failure.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: RunState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: RunState::Start,
        }
    }

    pub fn current(&self) -> RunState {
        self.current
    }

    /// Move forward to `next`.
    pub fn advance(&mut self, next: RunState) {
        debug_assert!(next > self.current, "{} -> {} goes backwards", self.current, next);
        debug!(from = %self.current, to = %next, "state transition");
        self.current = next;
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
