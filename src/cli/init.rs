//! Init command - write a starter refaudit.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Refaudit Configuration
#
# Phases run strictly in the order listed. The production-readiness gate is
# appended automatically when no phase fails; it cannot be listed here.
phases = [
    "static-analysis",
    "integration-analysis",
    "performance-validation",
    "compatibility-validation",
]

[thresholds]
# Minimum percentage improvements over the recorded baseline
# (.refaudit/baseline.json) required for the performance phase to pass.
bundle_size_reduction_min = 20.0
response_time_improvement_min = 15.0
memory_reduction_min = 10.0
compilation_time_improvement_min = 30.0

[compatibility]
zero_breaking_changes = true
backward_compatibility = true
api_contract_preservation = true

[reporting]
# text, json, or markdown
format = "text"
include_executive_summary = true
include_phase_details = true
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join("refaudit.toml");
    if config_path.exists() {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| "Failed to write refaudit.toml")?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nRecord a performance baseline at {} to enable gain measurement.",
        style(".refaudit/baseline.json").yellow()
    );

    Ok(())
}
