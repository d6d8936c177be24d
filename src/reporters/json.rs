//! JSON reporter
//!
//! Outputs the full audit result plus derived summary and score as
//! pretty-printed JSON. Useful for machine consumption, piping to jq, or
//! archiving audit runs in CI.

use crate::models::{AuditResult, ExecutiveSummary};
use crate::reporters::ReportContext;
use crate::scoring::ReadinessScore;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a AuditResult,
    executive_summary: &'a ExecutiveSummary,
    readiness: &'a ReadinessScore,
}

/// Render report as JSON
pub fn render(ctx: &ReportContext<'_>) -> Result<String> {
    let report = JsonReport {
        result: ctx.result,
        executive_summary: &ctx.summary,
        readiness: &ctx.readiness,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
