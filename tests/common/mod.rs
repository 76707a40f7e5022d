#![allow(dead_code)]
#![allow(unused_imports)]

pub use gradle_impact_test_utils::fake_gradle::{FakeGradle, Observation};
pub use gradle_impact_test_utils::fixtures::{GradleProject, git_available};
pub use gradle_impact_test_utils::{init_tracing, with_timeout};

/// The two-module layout every fixture uses: `app` depends on `core`.
pub const CORE_APP_ROWS: &[(&str, &str, &str)] = &[("core", "core", "app"), ("app", "app", "")];
