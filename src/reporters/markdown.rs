//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - CI job summaries
//! - Release checklists

use crate::models::{Impact, PhaseStatus};
use crate::reporters::ReportContext;
use crate::scoring::deployment_tier;
use anyhow::Result;
use chrono::Local;

/// Maximum findings to show per phase section
const MAX_FINDINGS_PER_PHASE: usize = 10;

/// Render report as GitHub-flavored Markdown
pub fn render(ctx: &ReportContext<'_>) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(ctx));
    md.push('\n');

    if ctx.include_executive_summary {
        md.push_str(&render_summary(ctx));
        md.push('\n');
    }

    md.push_str(&render_phase_table(ctx));
    md.push('\n');

    if ctx.include_phase_details {
        md.push_str(&render_phase_details(ctx));
        md.push('\n');
    }

    md.push_str(&render_issues(ctx));
    md.push('\n');

    md.push_str(&render_recommendations(ctx));

    Ok(md)
}

fn status_emoji(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Pass => "✅",
        PhaseStatus::Warning => "⚠️",
        PhaseStatus::Fail => "❌",
        PhaseStatus::Pending => "⏳",
    }
}

fn render_header(ctx: &ReportContext<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"# {} Refaudit Report

**Overall: {}** | **Readiness score: {}/100** ({})

Generated: {}
"#,
        status_emoji(ctx.result.overall),
        ctx.result.overall,
        ctx.readiness.score,
        deployment_tier(ctx.readiness.score),
        timestamp
    )
}

fn render_summary(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("## Executive Summary\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| Overall status | {} |\n", ctx.summary.overall_status));
    md.push_str(&format!("| Critical issues | {} |\n", ctx.summary.critical_issues));
    md.push_str(&format!("| Warning phases | {} |\n", ctx.summary.warning_issues));
    md.push_str(&format!(
        "| Compatibility | {} |\n",
        ctx.summary.compatibility_status
    ));
    if let Some(gains) = &ctx.summary.performance_gains {
        md.push_str(&format!(
            "| Bundle size reduction | {:.1}% |\n",
            gains.bundle_size_reduction
        ));
        md.push_str(&format!(
            "| Response time improvement | {:.1}% |\n",
            gains.response_time_improvement
        ));
        md.push_str(&format!("| Memory reduction | {:.1}% |\n", gains.memory_reduction));
    }
    md.push_str(&format!(
        "| Deployment ready | {} |\n",
        if ctx.readiness.readiness { "yes" } else { "no" }
    ));
    md
}

fn render_phase_table(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("## Phases\n\n");
    md.push_str("| Phase | Status | Duration | Findings |\n");
    md.push_str("|-------|--------|----------|----------|\n");
    for phase in &ctx.result.phases {
        md.push_str(&format!(
            "| {} | {} {} | {}ms | {} |\n",
            phase.phase,
            status_emoji(phase.status),
            phase.status,
            phase.duration_ms,
            phase.findings.len()
        ));
    }
    md
}

fn render_phase_details(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("## Phase Details\n\n");
    for phase in &ctx.result.phases {
        if phase.findings.is_empty() {
            continue;
        }
        md.push_str(&format!("### {}\n\n", phase.phase));
        for finding in phase.findings.iter().take(MAX_FINDINGS_PER_PHASE) {
            let marker = match finding.impact {
                Impact::Positive => "+",
                Impact::Negative => "-",
                Impact::Neutral => "·",
            };
            md.push_str(&format!("- `{}` {} {}\n", marker, finding.category, finding.description));
            if let Some(rec) = &finding.recommendation {
                md.push_str(&format!("  - _{}_\n", rec));
            }
        }
        let hidden = phase.findings.len().saturating_sub(MAX_FINDINGS_PER_PHASE);
        if hidden > 0 {
            md.push_str(&format!("- …and {hidden} more\n"));
        }
        md.push('\n');
    }
    md
}

fn render_issues(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("## Issues\n\n");
    if ctx.result.issues.is_empty() {
        md.push_str("No tracked issues.\n");
        return md;
    }
    md.push_str("| Severity | Type | Phase | Message |\n");
    md.push_str("|----------|------|-------|--------|\n");
    for issue in &ctx.result.issues {
        let phase = issue
            .phase
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            issue.severity, issue.issue_type, phase, issue.message
        ));
    }
    md
}

fn render_recommendations(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("## Recommendations\n\n");
    for (i, rec) in ctx.result.recommendations.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    md
}
