// tests/restore_invariant.rs
//
// Whatever happens during discovery, the build file must end up
// byte-identical and no generated file may be left in the project.

mod common;
use crate::common::{FakeGradle, GradleProject, init_tracing, with_timeout};

use std::error::Error;

use gradle_impact::engine::Orchestrator;
use gradle_impact::errors::ImpactError;

type TestResult = Result<(), Box<dyn Error>>;

fn assert_pristine(project: &GradleProject, before: &[u8], entries: &[String]) {
    assert_eq!(project.build_file_bytes(), before, "build file changed");
    assert_eq!(project.root_entries(), entries, "project root changed");
    assert!(!project.exists("incremental.gradle"));
    assert!(!project.exists("incremental.csv"));
    assert!(!project.exists("build.gradle.bak"));
    assert!(!project.exists("build.gradle.kts.bak"));
}

#[tokio::test]
async fn build_failure_restores_everything() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    let before = project.build_file_bytes();
    let entries = project.root_entries();

    let fake = FakeGradle::failing(1);
    let seen = fake.observations();
    let orchestrator = Orchestrator::new(project.run_config("main", "feature"), fake)?;

    let result = with_timeout(orchestrator.discover_modules()).await;

    match result {
        Err(ImpactError::BuildInvocationError(msg)) => assert!(msg.contains("code 1")),
        other => panic!("expected BuildInvocationError, got {other:?}"),
    }
    // The build really ran against the mutated project.
    let seen = seen.lock().unwrap();
    assert!(seen[0].sidecar_present);
    assert!(seen[0].build_file.ends_with("apply from: 'incremental.gradle'\n"));

    assert_pristine(&project, &before, &entries);
    Ok(())
}

#[tokio::test]
async fn malformed_report_restores_everything() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    let before = project.build_file_bytes();
    let entries = project.root_entries();

    let fake = FakeGradle::writing_raw("\"core\",\"/x/core\",\"app\"\n\"app\"\n");
    let orchestrator = Orchestrator::new(project.run_config("main", "feature"), fake)?;

    let result = with_timeout(orchestrator.discover_modules()).await;

    match result {
        Err(ImpactError::ReportParseError(msg)) => assert!(msg.contains("row 2")),
        other => panic!("expected ReportParseError, got {other:?}"),
    }
    assert_pristine(&project, &before, &entries);
    Ok(())
}

#[tokio::test]
async fn kotlin_build_failure_restores_everything() -> TestResult {
    init_tracing();
    let project = GradleProject::kotlin();
    let before = project.build_file_bytes();
    let entries = project.root_entries();

    let orchestrator =
        Orchestrator::new(project.run_config("main", "feature"), FakeGradle::failing(2))?;
    let result = with_timeout(orchestrator.discover_modules()).await;

    assert!(result.is_err());
    assert_pristine(&project, &before, &entries);
    Ok(())
}

#[tokio::test]
async fn build_file_without_trailing_newline_is_restored_exactly() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    project.write("build.gradle", "plugins { id 'java' }");
    let before = project.build_file_bytes();
    let entries = project.root_entries();

    let orchestrator =
        Orchestrator::new(project.run_config("main", "feature"), FakeGradle::failing(1))?;
    let _ = with_timeout(orchestrator.discover_modules()).await;

    assert_eq!(project.build_file_bytes(), b"plugins { id 'java' }");
    assert_pristine(&project, &before, &entries);
    Ok(())
}

#[tokio::test]
async fn stale_report_is_not_mistaken_for_fresh_output() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    let before = project.build_file_bytes();
    project.write("incremental.csv", "\"old\",\"/old\",\"\"\n");

    let orchestrator =
        Orchestrator::new(project.run_config("main", "feature"), FakeGradle::failing(1))?;
    let result = with_timeout(orchestrator.discover_modules()).await;

    assert!(matches!(result, Err(ImpactError::BuildInvocationError(_))));
    assert!(!project.exists("incremental.csv"));
    assert_eq!(project.build_file_bytes(), before);
    Ok(())
}

#[tokio::test]
async fn foreign_sidecar_aborts_and_is_kept() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    project.write("incremental.gradle", "ext.mine = true\n");
    let before = project.build_file_bytes();

    let fake = FakeGradle::failing(1);
    let seen = fake.observations();
    let orchestrator = Orchestrator::new(project.run_config("main", "feature"), fake)?;
    let result = with_timeout(orchestrator.discover_modules()).await;

    assert!(matches!(result, Err(ImpactError::SidecarWriteError(_))));
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(project.build_file_bytes(), before);
    assert!(project.exists("incremental.gradle"));
    assert!(!project.exists("build.gradle.bak"));
    Ok(())
}

#[tokio::test]
async fn leftover_backup_refuses_to_run() -> TestResult {
    init_tracing();
    let project = GradleProject::groovy();
    project.write("build.gradle.bak", "// from a killed run\n");
    let before = project.build_file_bytes();

    let fake = FakeGradle::failing(1);
    let seen = fake.observations();
    let orchestrator = Orchestrator::new(project.run_config("main", "feature"), fake)?;
    let result = with_timeout(orchestrator.discover_modules()).await;

    match result {
        Err(ImpactError::BackupError(msg)) => assert!(msg.contains("--recover")),
        other => panic!("expected BackupError, got {other:?}"),
    }
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(project.build_file_bytes(), before);
    assert!(project.exists("build.gradle.bak"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn injection_failure_restores_everything() -> TestResult {
    use std::fs::{self, OpenOptions};
    use std::os::unix::fs::PermissionsExt;

    init_tracing();
    let project = GradleProject::groovy();
    let before = project.build_file_bytes();
    let entries = project.root_entries();

    // Readable for the backup, not writable for the append.
    fs::set_permissions(project.build_file(), fs::Permissions::from_mode(0o444))?;
    if OpenOptions::new().append(true).open(project.build_file()).is_ok() {
        eprintln!("permissions not enforced (running as root?); skipping");
        return Ok(());
    }

    let fake = FakeGradle::reporting(&[]);
    let seen = fake.observations();
    let orchestrator = Orchestrator::new(project.run_config("main", "feature"), fake)?;
    let result = with_timeout(orchestrator.discover_modules()).await;

    match result {
        Err(ImpactError::InjectionError(msg)) => assert!(msg.contains("build.gradle")),
        other => panic!("expected InjectionError, got {other:?}"),
    }
    assert!(seen.lock().unwrap().is_empty());
    assert_pristine(&project, &before, &entries);
    Ok(())
}
