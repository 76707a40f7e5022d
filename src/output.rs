// src/output.rs

//! Rendering of reports and plans for stdout.

use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::config::RunConfig;
use crate::errors::Result;
use crate::gradle::launcher::default_launcher_name;
use crate::types::ImpactReport;

pub fn render(report: &ImpactReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Toml => Ok(toml::to_string_pretty(report)?),
    }
}

/// Human-readable report.
pub fn render_text(report: &ImpactReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "changed files ({}..{}): {}",
        report.base,
        report.target,
        report.changed_files.len()
    );
    for file in &report.changed_files {
        let marker = if report.ignored_files.contains(file) {
            " (ignored)"
        } else {
            ""
        };
        let _ = writeln!(out, "  {file}{marker}");
    }

    if report.modules.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "modules ({}):", report.modules.len());
    for module in &report.modules {
        let _ = writeln!(out, "  - {}", module.name);
        let _ = writeln!(out, "      path: {}", module.path);
        let dependents: Vec<&str> = module.declared_dependents().collect();
        if !dependents.is_empty() {
            let _ = writeln!(out, "      dependents: {}", dependents.join(", "));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "affected modules ({}):", report.affected_modules.len());
    for name in &report.affected_modules {
        let _ = writeln!(out, "  {name}");
    }

    if !report.unowned_files.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "files outside any module ({}):", report.unowned_files.len());
        for file in &report.unowned_files {
            let _ = writeln!(out, "  {file}");
        }
    }

    out
}

/// Dry-run output: what a run would do, without doing it.
pub fn render_plan(config: &RunConfig) -> String {
    let settings = config.settings();
    let gradle = &settings.gradle;
    let mut out = String::new();

    let _ = writeln!(out, "gradle-impact dry-run");
    let _ = writeln!(out, "  project_dir = {}", config.project_dir().display());
    let _ = writeln!(
        out,
        "  diff = {} diff --name-only {}",
        settings.git.program,
        config.revision_range()
    );
    let _ = writeln!(out, "  sidecar_file = {}", gradle.sidecar_file);
    let _ = writeln!(out, "  report_file = {}", gradle.report_file);
    let _ = writeln!(
        out,
        "  gradle = {} {} -P{}=<report> {}",
        gradle.launcher.as_deref().unwrap_or(default_launcher_name()),
        gradle.task_name,
        gradle.output_property,
        gradle.extra_args.join(" ")
    );
    let _ = writeln!(out, "  configurations = {:?}", gradle.configurations);
    if !settings.changes.exclude.is_empty() {
        let _ = writeln!(out, "  exclude = {:?}", settings.changes.exclude);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Module;

    fn report() -> ImpactReport {
        ImpactReport {
            base: "main".into(),
            target: "feature".into(),
            changed_files: vec!["core/src/A.kt".into(), "README.md".into()],
            ignored_files: vec!["README.md".into()],
            unowned_files: vec![],
            modules: vec![
                Module {
                    name: "core".into(),
                    path: "/p/core".into(),
                    dependents: vec!["app".into()],
                },
                Module {
                    name: "app".into(),
                    path: "/p/app".into(),
                    dependents: vec!["".into()],
                },
            ],
            affected_modules: vec!["core".into(), "app".into()],
        }
    }

    #[test]
    fn text_lists_changes_modules_and_impact() {
        let text = render_text(&report());
        assert!(text.starts_with("changed files (main..feature): 2\n"));
        assert!(text.contains("  README.md (ignored)\n"));
        assert!(text.contains("      dependents: app\n"));
        assert!(text.contains("affected modules (2):\n  core\n  app\n"));
        assert!(!text.contains("files outside any module"));
    }

    #[test]
    fn toml_output_round_trips_through_parser() {
        let rendered = render(&report(), OutputFormat::Toml).unwrap();
        let value: toml::Value = toml::from_str(&rendered).unwrap();
        assert_eq!(value["modules"].as_array().unwrap().len(), 2);
        assert_eq!(value["affected_modules"][0].as_str(), Some("core"));
    }
}
