//! Core data models for Refaudit
//!
//! These models are shared across the audit controller, the analyzers,
//! the readiness scorer, and the reporters. Everything here is plain
//! data: created once per audit run and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of a single phase, or of the whole audit.
///
/// Ordering matters for aggregation: a single `Fail` dominates any number
/// of passing phases (first-match priority, see `AuditController`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Pass,
    Warning,
    Fail,
    #[default]
    Pending,
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseStatus::Pass => write!(f, "pass"),
            PhaseStatus::Warning => write!(f, "warning"),
            PhaseStatus::Fail => write!(f, "fail"),
            PhaseStatus::Pending => write!(f, "pending"),
        }
    }
}

/// One named stage of the audit pipeline, backed by exactly one analyzer.
///
/// `ProductionReadiness` is never accepted in user-supplied configuration;
/// the controller appends it at runtime when the gate condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    StaticAnalysis,
    IntegrationAnalysis,
    PerformanceValidation,
    CompatibilityValidation,
    ProductionReadiness,
}

impl Phase {
    /// The phases a default user configuration runs, in order.
    pub fn default_sequence() -> Vec<Phase> {
        vec![
            Phase::StaticAnalysis,
            Phase::IntegrationAnalysis,
            Phase::PerformanceValidation,
            Phase::CompatibilityValidation,
        ]
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::StaticAnalysis => write!(f, "static-analysis"),
            Phase::IntegrationAnalysis => write!(f, "integration-analysis"),
            Phase::PerformanceValidation => write!(f, "performance-validation"),
            Phase::CompatibilityValidation => write!(f, "compatibility-validation"),
            Phase::ProductionReadiness => write!(f, "production-readiness"),
        }
    }
}

/// Direction of a single observation surfaced by a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Severity levels for tracked issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Low => write!(f, "low"),
            IssueSeverity::Medium => write!(f, "medium"),
            IssueSeverity::High => write!(f, "high"),
            IssueSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Issue taxonomy. Severity is carried separately: an `IntegrationFailure`
/// can be high or medium depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    ConfigurationError,
    IntegrationFailure,
    PerformanceRegression,
    CompatibilityBreak,
    TypeSystemError,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::ConfigurationError => write!(f, "configuration-error"),
            IssueType::IntegrationFailure => write!(f, "integration-failure"),
            IssueType::PerformanceRegression => write!(f, "performance-regression"),
            IssueType::CompatibilityBreak => write!(f, "compatibility-break"),
            IssueType::TypeSystemError => write!(f, "type-system-error"),
        }
    }
}

/// Metric keys shared between the phase executor (writer) and the
/// readiness scorer and reporters (readers).
pub mod metric_keys {
    pub const BUNDLE_SIZE_REDUCTION: &str = "bundle_size_reduction";
    pub const RESPONSE_TIME_IMPROVEMENT: &str = "response_time_improvement";
    pub const MEMORY_REDUCTION: &str = "memory_reduction";
    pub const COMPILATION_TIME_IMPROVEMENT: &str = "compilation_time_improvement";
    /// How many of the three performance thresholds were met (0..=3).
    pub const THRESHOLDS_MET: &str = "thresholds_met";
    pub const READINESS_SCORE: &str = "readiness_score";
    pub const ISSUE_COUNT: &str = "issue_count";
}

/// A single observation surfaced by a phase
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Finding {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: Impact,
    /// Opaque supporting payload. The controller never introspects this.
    #[serde(default)]
    pub evidence: serde_json::Value,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// A tracked, severity-tagged problem accumulated across the whole run.
///
/// The issue list is an audit trail: issues are only ever appended,
/// never removed or rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub evidence: serde_json::Value,
    #[serde(default)]
    pub recommendation: Option<String>,
    /// Phase the issue was observed in; `None` for controller-level
    /// failures outside any phase boundary.
    pub phase: Option<Phase>,
}

/// Result of executing one phase. Created exactly once per execution and
/// owned by the controller's result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase: Phase,
    pub status: PhaseStatus,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PhaseResult {
    /// Look up a metric recorded by the analyzer.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }
}

/// The single terminal artifact of one controller run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub overall: PhaseStatus,
    /// Phases in the exact order they were executed.
    pub phases: Vec<PhaseResult>,
    #[serde(default)]
    pub aggregated_metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub issues: Vec<AuditIssue>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub total_duration_ms: u64,
}

impl AuditResult {
    /// Last result recorded for a phase tag, if the phase ran.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseResult> {
        self.phases.iter().rev().find(|p| p.phase == phase)
    }

    /// Count issues at a given severity.
    pub fn issue_count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Count phases at a given status.
    pub fn phase_count(&self, status: PhaseStatus) -> usize {
        self.phases.iter().filter(|p| p.status == status).count()
    }

    /// The exit code this result maps to at the process boundary:
    /// 0 iff the overall verdict is `Pass`, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.overall == PhaseStatus::Pass {
            0
        } else {
            1
        }
    }
}

/// Compatibility classification derived from the compatibility phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
    Maintained,
    Partial,
    Broken,
}

impl std::fmt::Display for CompatibilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompatibilityStatus::Maintained => write!(f, "maintained"),
            CompatibilityStatus::Partial => write!(f, "partial"),
            CompatibilityStatus::Broken => write!(f, "broken"),
        }
    }
}

/// Measured performance deltas, as percentages relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceGains {
    pub bundle_size_reduction: f64,
    pub response_time_improvement: f64,
    pub memory_reduction: f64,
    pub meets_thresholds: bool,
}

/// Executive summary handed to reporters. Derived state: always
/// reproducible from the `AuditResult` alone, never persisted as
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overall_status: PhaseStatus,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub performance_gains: Option<PerformanceGains>,
    pub compatibility_status: CompatibilityStatus,
    /// Top five recommendations, in synthesis order.
    pub recommendations: Vec<String>,
    pub readiness_score: u32,
}
