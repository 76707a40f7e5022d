//! Shared helpers for the `gradle-impact` integration tests.

pub mod fake_gradle;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use gradle_impact::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Upper bound for one test; a real Gradle wrapper is never involved.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured by the harness and shown for failing tests only.
/// Filter with the same variable the binary reads, e.g.
/// `GRADLE_IMPACT_LOG=gradle_impact::engine=debug`. Default: `warn`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Fail the test if `f` does not finish within [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test did not finish within {TEST_TIMEOUT:?}"))
}
