//! CLI command definitions and handlers

mod audit;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Refaudit - Multi-phase refactoring audit
///
/// Answers one question after a large refactor: did we break anything,
/// and are we production-ready?
#[derive(Parser, Debug)]
#[command(name = "refaudit")]
#[command(
    version,
    about = "Multi-phase refactoring audit: run analyzers in sequence and score deployment readiness",
    long_about = "Refaudit runs a configurable sequence of independent analyzers against a \
codebase, aggregates their statuses into one verdict, computes a weighted \
deployment-readiness score, and emits a report.\n\n\
Exit code is 0 only when every phase passes, which makes it suitable as a CI \
release gate.",
    after_help = "\
Examples:
  refaudit                              Audit the current directory
  refaudit audit --format json          JSON output for scripting
  refaudit audit --format md -o report.md   Markdown report for a PR comment
  refaudit init                         Write a refaudit.toml with defaults

Configuration: refaudit.toml in the repository root (see `refaudit init`)"
)]
pub struct Cli {
    /// Path to the repository to audit
    #[arg(long, short = 'p', global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a refaudit.toml config file with example settings
    Init,

    /// Run the audit pipeline (default when no subcommand is given)
    #[command(after_help = "\
Examples:
  refaudit audit                         Audit current directory
  refaudit audit --path /path/to/repo    Audit a specific repo
  refaudit audit --format json           JSON output for scripting
  refaudit audit --format md -o audit.md   Markdown report to a file")]
    Audit {
        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
        format: Option<String>,

        /// Output file path (default: stdout, or config's output_path)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Dispatch a parsed CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),
        Some(Commands::Audit { format, output }) => audit::run(&cli.path, format, output),
        // Bare `refaudit <path>` audits with config defaults.
        None => audit::run(&cli.path, None, None),
    }
}
