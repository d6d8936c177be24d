//! Text (terminal) reporter with colors and formatting

use crate::models::{Impact, PhaseStatus};
use crate::reporters::ReportContext;
use crate::scoring::deployment_tier;
use anyhow::Result;

/// Status colors (ANSI escape codes)
fn status_color(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Pass => "\x1b[32m",    // Green
        PhaseStatus::Warning => "\x1b[33m", // Yellow
        PhaseStatus::Fail => "\x1b[31m",    // Red
        PhaseStatus::Pending => "\x1b[90m", // Gray
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Status tag
fn status_tag(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Pass => "[PASS]",
        PhaseStatus::Warning => "[WARN]",
        PhaseStatus::Fail => "[FAIL]",
        PhaseStatus::Pending => "[PEND]",
    }
}

/// Render report as formatted terminal output
pub fn render(ctx: &ReportContext<'_>) -> Result<String> {
    let mut out = String::new();

    let overall_c = status_color(ctx.result.overall);
    out.push_str(&format!("\n{BOLD}Refaudit Report{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Overall: {overall_c}{BOLD}{}{RESET}  Score: {BOLD}{}/100{RESET} ({})  ",
        ctx.result.overall,
        ctx.readiness.score,
        deployment_tier(ctx.readiness.score)
    ));
    out.push_str(&format!(
        "Compatibility: {}  Duration: {}ms\n\n",
        ctx.readiness.compatibility, ctx.result.total_duration_ms
    ));

    // Phase table
    for phase in &ctx.result.phases {
        let c = status_color(phase.status);
        out.push_str(&format!(
            "  {c}{}{RESET} {:<26} {DIM}{}ms{RESET}\n",
            status_tag(phase.status),
            phase.phase.to_string(),
            phase.duration_ms
        ));
        if ctx.include_phase_details {
            for finding in &phase.findings {
                let marker = match finding.impact {
                    Impact::Positive => "+",
                    Impact::Negative => "-",
                    Impact::Neutral => "·",
                };
                out.push_str(&format!("      {marker} {}\n", finding.description));
            }
        }
    }

    // Issues
    if !ctx.result.issues.is_empty() {
        out.push_str(&format!("\n{BOLD}Issues{RESET}\n"));
        for issue in &ctx.result.issues {
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                issue.severity, issue.issue_type, issue.message
            ));
        }
    }

    // Recommendations
    if !ctx.result.recommendations.is_empty() {
        out.push_str(&format!("\n{BOLD}Recommendations{RESET}\n"));
        for rec in &ctx.result.recommendations {
            out.push_str(&format!("  • {rec}\n"));
        }
    }

    Ok(out)
}
