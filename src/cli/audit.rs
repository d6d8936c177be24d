//! Audit command - run the full pipeline and report

use crate::analyzers::AnalyzerSet;
use crate::audit::AuditController;
use crate::config::load_audit_config;
use crate::reporters::{self, OutputFormat, ReportContext};
use crate::scoring::deployment_tier;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the audit command
pub fn run(path: &Path, format: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let mut config = load_audit_config(&repo_path);
    if let Some(format) = format {
        config.reporting.format = format;
    }
    if let Some(output) = output {
        config.reporting.output_path = Some(output);
    }

    println!(
        "\n{} Auditing {}\n",
        style("🔍").bold(),
        style(repo_path.display()).cyan()
    );

    let analyzers = AnalyzerSet::for_target(&repo_path, &config);
    let controller = AuditController::new(config.clone(), analyzers);
    let result = controller.execute_audit();

    let fmt = OutputFormat::from_str(&config.reporting.format)?;
    let ctx = ReportContext::new(&result).with_toggles(
        config.reporting.include_executive_summary,
        config.reporting.include_phase_details,
    );
    let rendered = reporters::report_with_format(&ctx, fmt)?;

    let write_to_file =
        config.reporting.output_path.is_some() || fmt == OutputFormat::Markdown;
    if write_to_file {
        let out_path = config
            .reporting
            .output_path
            .clone()
            .unwrap_or_else(|| {
                repo_path.join(format!("refaudit-report.{}", reporters::file_extension(fmt)))
            });
        std::fs::write(&out_path, &rendered)
            .with_context(|| format!("writing report to {}", out_path.display()))?;
        println!(
            "{} Report written to {}",
            style("📄").bold(),
            style(out_path.display()).cyan()
        );
    } else {
        println!("{rendered}");
    }

    // One-line verdict for operators, regardless of format.
    let score = ctx.readiness.score;
    eprintln!(
        "{} overall={} score={}/100 ({})",
        style("▸").bold(),
        result.overall,
        score,
        deployment_tier(score)
    );

    // Exit contract: 0 iff overall == pass.
    let code = result.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
