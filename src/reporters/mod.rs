//! Output reporters for audit results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with ANSI colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown for PR comments

mod json;
mod markdown;
mod text;

use crate::models::{AuditResult, ExecutiveSummary};
use crate::scoring::{self, ReadinessScore};
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Everything a reporter needs for one render pass. The summary and score
/// are derived from the result on demand, never persisted.
pub struct ReportContext<'a> {
    pub result: &'a AuditResult,
    pub summary: ExecutiveSummary,
    pub readiness: ReadinessScore,
    pub include_executive_summary: bool,
    pub include_phase_details: bool,
}

impl<'a> ReportContext<'a> {
    pub fn new(result: &'a AuditResult) -> Self {
        Self {
            result,
            summary: scoring::summarize(result),
            readiness: scoring::score(result),
            include_executive_summary: true,
            include_phase_details: true,
        }
    }

    pub fn with_toggles(mut self, executive_summary: bool, phase_details: bool) -> Self {
        self.include_executive_summary = executive_summary;
        self.include_phase_details = phase_details;
        self
    }
}

/// Render an audit result in the specified format
pub fn report(result: &AuditResult, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(&ReportContext::new(result), fmt)
}

/// Render a prepared report context using an OutputFormat enum
pub fn report_with_format(ctx: &ReportContext<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(ctx),
        OutputFormat::Json => json::render(ctx),
        OutputFormat::Markdown => markdown::render(ctx),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        AuditIssue, Finding, Impact, IssueSeverity, IssueType, Phase, PhaseResult, PhaseStatus,
    };
    use chrono::Utc;
    use std::collections::BTreeMap;

    /// Create a representative AuditResult for reporter tests
    pub(crate) fn test_result() -> AuditResult {
        use crate::models::metric_keys;

        let mut perf_metrics = BTreeMap::new();
        perf_metrics.insert(metric_keys::BUNDLE_SIZE_REDUCTION.to_string(), 30.0);
        perf_metrics.insert(metric_keys::RESPONSE_TIME_IMPROVEMENT.to_string(), 20.0);
        perf_metrics.insert(metric_keys::MEMORY_REDUCTION.to_string(), 5.0);
        perf_metrics.insert(metric_keys::THRESHOLDS_MET.to_string(), 2.0);

        let phases = vec![
            PhaseResult {
                phase: Phase::StaticAnalysis,
                status: PhaseStatus::Pass,
                metrics: BTreeMap::new(),
                findings: vec![],
                duration_ms: 12,
                started_at: Utc::now(),
                finished_at: Utc::now(),
            },
            PhaseResult {
                phase: Phase::PerformanceValidation,
                status: PhaseStatus::Warning,
                metrics: perf_metrics,
                findings: vec![Finding {
                    category: "performance".into(),
                    description: "memory reduction below threshold".into(),
                    impact: Impact::Negative,
                    evidence: serde_json::Value::Null,
                    recommendation: Some("profile allocation hot spots".into()),
                }],
                duration_ms: 140,
                started_at: Utc::now(),
                finished_at: Utc::now(),
            },
            PhaseResult {
                phase: Phase::CompatibilityValidation,
                status: PhaseStatus::Pass,
                metrics: BTreeMap::new(),
                findings: vec![],
                duration_ms: 33,
                started_at: Utc::now(),
                finished_at: Utc::now(),
            },
        ];

        AuditResult {
            overall: PhaseStatus::Warning,
            phases,
            aggregated_metrics: BTreeMap::new(),
            issues: vec![AuditIssue {
                issue_type: IssueType::PerformanceRegression,
                severity: IssueSeverity::Medium,
                message: "performance gains below configured thresholds".into(),
                location: String::new(),
                evidence: serde_json::Value::Null,
                recommendation: Some("profile the refactored paths".into()),
                phase: Some(Phase::PerformanceValidation),
            }],
            recommendations: vec![
                "Address the identified issues before considering deployment".into(),
                "performance-validation: close the gap to the configured performance thresholds (warning)".into(),
            ],
            timestamp: Utc::now(),
            total_duration_ms: 185,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_all_formats_render() {
        let result = test_result();
        for format in ["text", "json", "markdown"] {
            let rendered = report(&result, format).unwrap();
            assert!(!rendered.is_empty(), "{format} produced empty report");
        }
    }
}
