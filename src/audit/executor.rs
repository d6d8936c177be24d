//! Phase executor with failure isolation
//!
//! Wraps one analyzer invocation with wall-clock timing and converts any
//! escaped error (including panics) into a synthetic failed-phase result.
//! Failure of one analyzer never aborts the pipeline: the controller keeps
//! driving the remaining phases.
//!
//! The executor also owns the per-analyzer status-derivation rules. They
//! are deliberately NOT one global rule: static analysis can fail hard on
//! high-severity issues, while performance and compatibility shortfalls
//! only ever warn unless the analyzer itself crashes.

use crate::analyzers::{Analyzer, AnalyzerIssue, AnalyzerReport};
use crate::config::Thresholds;
use crate::models::{
    metric_keys, AuditIssue, Finding, Impact, IssueSeverity, IssueType, Phase, PhaseResult,
    PhaseStatus,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error};

/// Outcome of executing one phase: the immutable result plus the issues it
/// contributed to the run-wide audit trail.
#[derive(Debug, Clone)]
pub struct ExecutedPhase {
    pub result: PhaseResult,
    pub issues: Vec<AuditIssue>,
}

/// Executes one analyzer per call, isolating its failures.
pub struct PhaseExecutor {
    thresholds: Thresholds,
}

impl PhaseExecutor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Run one phase to completion. Never returns an error: analyzer
    /// failures become a `Fail` result with a critical issue attached.
    pub fn execute(&self, phase: Phase, analyzer: &dyn Analyzer) -> ExecutedPhase {
        let started_at = Utc::now();
        let start = Instant::now();

        debug!(%phase, analyzer = analyzer.name(), "executing phase");

        let outcome =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| analyzer.run()));

        let duration_ms = start.elapsed().as_millis() as u64;
        let finished_at = Utc::now();

        match outcome {
            Ok(Ok(report)) => {
                let status = self.derive_status(&report);
                let metrics = self.extract_metrics(&report);
                let findings = collect_findings(&report);
                let issues = promote_issues(phase, &report);

                ExecutedPhase {
                    result: PhaseResult {
                        phase,
                        status,
                        metrics,
                        findings,
                        duration_ms,
                        started_at,
                        finished_at,
                    },
                    issues,
                }
            }
            Ok(Err(e)) => {
                error!(%phase, error = %e, "analyzer failed");
                self.failed(phase, format!("{e:#}"), duration_ms)
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                error!(%phase, panic = %panic_msg, "analyzer panicked");
                self.failed(phase, format!("panic: {panic_msg}"), duration_ms)
            }
        }
    }

    /// Synthesize a failed phase. Also used by the controller when a
    /// configured phase has no registered analyzer.
    pub fn failed(&self, phase: Phase, error: String, duration_ms: u64) -> ExecutedPhase {
        let now = Utc::now();
        let finding = Finding {
            category: "execution".into(),
            description: format!("phase {phase} did not complete: {error}"),
            impact: Impact::Negative,
            evidence: serde_json::json!({ "error": error }),
            recommendation: Some(format!("fix the {phase} analyzer and re-run the audit")),
        };
        let issue = AuditIssue {
            issue_type: IssueType::ConfigurationError,
            severity: IssueSeverity::Critical,
            message: format!("analyzer for {phase} failed: {error}"),
            location: String::new(),
            evidence: serde_json::Value::Null,
            recommendation: Some(format!("fix the {phase} analyzer and re-run the audit")),
            phase: Some(phase),
        };

        ExecutedPhase {
            result: PhaseResult {
                phase,
                status: PhaseStatus::Fail,
                metrics: BTreeMap::new(),
                findings: vec![finding],
                duration_ms,
                started_at: now,
                finished_at: now,
            },
            issues: vec![issue],
        }
    }

    fn derive_status(&self, report: &AnalyzerReport) -> PhaseStatus {
        match report {
            AnalyzerReport::Integration(r) => {
                if r.type_system_coherence && r.cross_layer_consistency && r.issues.is_empty() {
                    PhaseStatus::Pass
                } else if r.issues.iter().any(|i| i.severity >= IssueSeverity::High) {
                    PhaseStatus::Fail
                } else {
                    PhaseStatus::Warning
                }
            }
            // Performance shortfalls are never fatal on their own.
            AnalyzerReport::Performance(r) => {
                if r.gains.meets_thresholds {
                    PhaseStatus::Pass
                } else {
                    PhaseStatus::Warning
                }
            }
            // Compatibility regressions are reported, not fatal.
            AnalyzerReport::Compatibility(r) => {
                let sub_checks_clean = r.error_response_issues.is_empty()
                    && r.authentication_issues.is_empty()
                    && r.database_issues.is_empty();
                if r.api_contract_ok && r.backward_compatibility_ok && sub_checks_clean {
                    PhaseStatus::Pass
                } else {
                    PhaseStatus::Warning
                }
            }
            AnalyzerReport::ProductionReadiness(r) => {
                if r.overall_readiness {
                    PhaseStatus::Pass
                } else {
                    PhaseStatus::Warning
                }
            }
            AnalyzerReport::NotImplemented { .. } => PhaseStatus::Pending,
        }
    }

    fn extract_metrics(&self, report: &AnalyzerReport) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        match report {
            AnalyzerReport::Integration(r) => {
                metrics.insert(metric_keys::ISSUE_COUNT.into(), r.issues.len() as f64);
            }
            AnalyzerReport::Performance(r) => {
                metrics.insert(
                    metric_keys::BUNDLE_SIZE_REDUCTION.into(),
                    r.gains.bundle_size_reduction,
                );
                metrics.insert(
                    metric_keys::RESPONSE_TIME_IMPROVEMENT.into(),
                    r.gains.response_time_improvement,
                );
                metrics.insert(metric_keys::MEMORY_REDUCTION.into(), r.gains.memory_reduction);
                metrics.insert(
                    metric_keys::COMPILATION_TIME_IMPROVEMENT.into(),
                    r.compilation_time_improvement,
                );
                metrics.insert(
                    metric_keys::THRESHOLDS_MET.into(),
                    self.thresholds_met(r) as f64,
                );
            }
            AnalyzerReport::Compatibility(r) => {
                let total = r.error_response_issues.len()
                    + r.authentication_issues.len()
                    + r.database_issues.len();
                metrics.insert(metric_keys::ISSUE_COUNT.into(), total as f64);
            }
            AnalyzerReport::ProductionReadiness(r) => {
                metrics.insert(metric_keys::READINESS_SCORE.into(), r.readiness_score);
            }
            AnalyzerReport::NotImplemented { .. } => {}
        }
        metrics
    }

    /// How many of the three scored performance thresholds the gains meet.
    fn thresholds_met(&self, r: &crate::analyzers::PerformanceReport) -> usize {
        [
            (
                r.gains.bundle_size_reduction,
                self.thresholds.bundle_size_reduction_min,
            ),
            (
                r.gains.response_time_improvement,
                self.thresholds.response_time_improvement_min,
            ),
            (r.gains.memory_reduction, self.thresholds.memory_reduction_min),
        ]
        .iter()
        .filter(|(gain, min)| gain >= min)
        .count()
    }
}

/// Findings the phase result carries: the analyzer's own findings, or for
/// analyzers that report raw issue lists, one synthesized finding per issue.
fn collect_findings(report: &AnalyzerReport) -> Vec<Finding> {
    match report {
        AnalyzerReport::Integration(r) => r
            .issues
            .iter()
            .map(|issue| Finding {
                category: issue.kind.clone(),
                description: issue.message.clone(),
                impact: Impact::Negative,
                evidence: serde_json::json!({ "location": issue.location }),
                recommendation: None,
            })
            .collect(),
        AnalyzerReport::NotImplemented { note } => vec![Finding {
            category: "pipeline".into(),
            description: note.clone(),
            impact: Impact::Neutral,
            evidence: serde_json::Value::Null,
            recommendation: None,
        }],
        other => other.findings().to_vec(),
    }
}

/// Promote analyzer-reported problems into run-wide tracked issues.
fn promote_issues(phase: Phase, report: &AnalyzerReport) -> Vec<AuditIssue> {
    fn from_analyzer(
        phase: Phase,
        issue_type: IssueType,
        issue: &AnalyzerIssue,
    ) -> AuditIssue {
        AuditIssue {
            issue_type,
            severity: issue.severity,
            message: issue.message.clone(),
            location: issue.location.clone(),
            evidence: serde_json::json!({ "kind": issue.kind }),
            recommendation: None,
            phase: Some(phase),
        }
    }

    match report {
        AnalyzerReport::Integration(r) => r
            .issues
            .iter()
            .filter(|i| i.severity >= IssueSeverity::High)
            .map(|i| {
                let issue_type = if i.kind.starts_with("type-") {
                    IssueType::TypeSystemError
                } else {
                    IssueType::IntegrationFailure
                };
                from_analyzer(phase, issue_type, i)
            })
            .collect(),
        AnalyzerReport::Performance(r) => {
            if r.gains.meets_thresholds {
                Vec::new()
            } else {
                vec![AuditIssue {
                    issue_type: IssueType::PerformanceRegression,
                    severity: IssueSeverity::Medium,
                    message: "performance gains below configured thresholds".into(),
                    location: String::new(),
                    evidence: serde_json::json!({
                        "bundle_size_reduction": r.gains.bundle_size_reduction,
                        "response_time_improvement": r.gains.response_time_improvement,
                        "memory_reduction": r.gains.memory_reduction,
                    }),
                    recommendation: Some(
                        "profile the refactored paths and close the remaining gap".into(),
                    ),
                    phase: Some(phase),
                }]
            }
        }
        AnalyzerReport::Compatibility(r) => r
            .error_response_issues
            .iter()
            .chain(&r.authentication_issues)
            .chain(&r.database_issues)
            .map(|i| from_analyzer(phase, IssueType::CompatibilityBreak, i))
            .collect(),
        AnalyzerReport::ProductionReadiness(_) | AnalyzerReport::NotImplemented { .. } => {
            Vec::new()
        }
    }
}
