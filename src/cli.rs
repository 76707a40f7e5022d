// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gradle-impact`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gradle-impact",
    version,
    about = "List files changed between two revisions and the Gradle modules they affect.",
    long_about = None
)]
pub struct CliArgs {
    /// Root of the Gradle project (also the git repository root).
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Base revision of the diff (e.g. `main`).
    #[arg(long, value_name = "REV", required_unless_present = "recover")]
    pub base: Option<String>,

    /// Target revision of the diff (e.g. `feature/x`).
    #[arg(long, value_name = "REV", required_unless_present = "recover")]
    pub target: Option<String>,

    /// Path to a config file (TOML).
    ///
    /// Default: `gradle-impact.toml` in the project directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for the report on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only list changed files; do not run Gradle.
    #[arg(long)]
    pub changed_only: bool,

    /// Resolve configuration and print the plan, but touch nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Restore a build file left modified by an interrupted run, then exit.
    #[arg(long, conflicts_with_all = ["dry_run", "changed_only"])]
    pub recover: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GRADLE_IMPACT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Report format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
