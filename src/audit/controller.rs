//! Audit controller
//!
//! Owns the ordered list of configured phases, drives the `PhaseExecutor`
//! for each, decides whether the production-readiness gate runs, and folds
//! all phase outcomes into one `AuditResult`.
//!
//! `execute_audit` is total: errors outside the per-phase isolation
//! boundary (invalid configuration, missing analyzers at setup) are caught
//! at the top and converted to a terminal failed result. No error ever
//! propagates to the caller from the run path.

use crate::analyzers::AnalyzerSet;
use crate::audit::executor::PhaseExecutor;
use crate::audit::observer::{AuditObserver, TracingObserver};
use crate::config::AuditConfig;
use crate::models::{
    AuditIssue, AuditResult, IssueSeverity, IssueType, Phase, PhaseResult, PhaseStatus,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info};

pub struct AuditController {
    config: AuditConfig,
    analyzers: AnalyzerSet,
    observer: Box<dyn AuditObserver>,
    started_at: DateTime<Utc>,
}

impl AuditController {
    pub fn new(config: AuditConfig, analyzers: AnalyzerSet) -> Self {
        Self {
            config,
            analyzers,
            observer: Box::new(TracingObserver),
            started_at: Utc::now(),
        }
    }

    /// Replace the lifecycle observer (tests use a recording one).
    pub fn with_observer(mut self, observer: Box<dyn AuditObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full audit. Never returns an error and never panics on
    /// analyzer misbehavior; the worst case is a result with
    /// `overall == Fail` and a critical issue describing the crash.
    pub fn execute_audit(&self) -> AuditResult {
        let start = Instant::now();
        let mut phases: Vec<PhaseResult> = Vec::new();
        let mut issues: Vec<AuditIssue> = Vec::new();

        let result = match self.run_phases(&mut phases, &mut issues) {
            Ok(()) => self.finalize(phases, issues, start),
            Err(e) => {
                error!(error = %e, "audit aborted outside phase boundary");
                self.crash_result(phases, issues, &e, start)
            }
        };

        self.observer.audit_finished(&result);
        result
    }

    /// Execute configured phases in order, then the conditional gate.
    /// Only setup problems (invalid config) can return `Err`; everything
    /// analyzer-related is isolated per phase.
    fn run_phases(
        &self,
        phases: &mut Vec<PhaseResult>,
        issues: &mut Vec<AuditIssue>,
    ) -> Result<()> {
        self.config.validate()?;

        let executor = PhaseExecutor::new(self.config.thresholds);

        // Strict configured order: no reordering, no deduplication. A phase
        // listed twice runs twice and both results are appended.
        for &phase in &self.config.phases {
            self.run_one(&executor, phase, phases, issues);
        }

        let run_gate = !phases.iter().any(|p| p.status == PhaseStatus::Fail);
        self.observer.gate_decision(run_gate);
        if run_gate {
            self.run_one(&executor, Phase::ProductionReadiness, phases, issues);
        } else {
            debug!("skipping production readiness gate");
        }

        Ok(())
    }

    fn run_one(
        &self,
        executor: &PhaseExecutor,
        phase: Phase,
        phases: &mut Vec<PhaseResult>,
        issues: &mut Vec<AuditIssue>,
    ) {
        self.observer.phase_started(phase);

        let executed = match self.analyzers.get(phase) {
            Some(analyzer) => executor.execute(phase, analyzer.as_ref()),
            // A configured phase with no backing analyzer fails in
            // isolation, like any other analyzer crash.
            None => executor.failed(phase, "no analyzer registered".into(), 0),
        };

        self.observer.phase_completed(&executed.result);
        issues.extend(executed.issues);
        phases.push(executed.result);
    }

    fn finalize(
        &self,
        phases: Vec<PhaseResult>,
        issues: Vec<AuditIssue>,
        start: Instant,
    ) -> AuditResult {
        let overall = aggregate_status(&phases);
        let recommendations = synthesize_recommendations(&phases, &issues);
        let aggregated_metrics = aggregate_metrics(&phases);

        info!(%overall, phases = phases.len(), "aggregated audit verdict");

        AuditResult {
            overall,
            phases,
            aggregated_metrics,
            issues,
            recommendations,
            timestamp: self.started_at,
            total_duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Terminal result for a crash outside any phase: overall `Fail`,
    /// whatever phases had already been appended, one critical issue.
    fn crash_result(
        &self,
        phases: Vec<PhaseResult>,
        mut issues: Vec<AuditIssue>,
        error: &anyhow::Error,
        start: Instant,
    ) -> AuditResult {
        issues.push(AuditIssue {
            issue_type: IssueType::ConfigurationError,
            severity: IssueSeverity::Critical,
            message: format!("audit aborted: {error:#}"),
            location: String::new(),
            evidence: serde_json::Value::Null,
            recommendation: Some("fix the audit configuration and re-run".into()),
            phase: None,
        });

        AuditResult {
            overall: PhaseStatus::Fail,
            phases,
            aggregated_metrics: BTreeMap::new(),
            issues,
            recommendations: vec![format!("resolve the audit crash: {error:#}")],
            timestamp: self.started_at,
            total_duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// First-match priority, not majority vote: a single `Fail` dominates any
/// number of passing phases.
fn aggregate_status(phases: &[PhaseResult]) -> PhaseStatus {
    if phases.iter().any(|p| p.status == PhaseStatus::Fail) {
        PhaseStatus::Fail
    } else if phases.iter().any(|p| p.status == PhaseStatus::Warning) {
        PhaseStatus::Warning
    } else if phases.iter().any(|p| p.status == PhaseStatus::Pending) {
        PhaseStatus::Pending
    } else {
        PhaseStatus::Pass
    }
}

/// Fold each phase's metrics into one map under phase-prefixed keys.
/// A phase that ran twice overwrites its earlier values (last write wins).
fn aggregate_metrics(phases: &[PhaseResult]) -> BTreeMap<String, f64> {
    let mut aggregated = BTreeMap::new();
    for phase in phases {
        for (key, value) in &phase.metrics {
            aggregated.insert(format!("{}.{}", phase.phase, key), *value);
        }
    }
    aggregated
}

/// Recommendation order: generic issue notice first, then one item per
/// failed or warning phase in execution order, then maintenance defaults
/// only if nothing else triggered.
fn synthesize_recommendations(phases: &[PhaseResult], issues: &[AuditIssue]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !issues.is_empty() {
        recommendations
            .push("Address the identified issues before considering deployment".to_string());
    }

    for phase in phases {
        match phase.status {
            PhaseStatus::Fail | PhaseStatus::Warning => {
                recommendations.push(phase_recommendation(phase));
            }
            PhaseStatus::Pass | PhaseStatus::Pending => {}
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Keep performance baselines up to date for future audits".to_string());
        recommendations
            .push("Re-run the audit after the next significant refactor".to_string());
    }

    recommendations
}

fn phase_recommendation(phase: &PhaseResult) -> String {
    let action = match phase.phase {
        Phase::StaticAnalysis => "resolve the static analysis issues across layers",
        Phase::IntegrationAnalysis => "complete the integration analysis checks",
        Phase::PerformanceValidation => "close the gap to the configured performance thresholds",
        Phase::CompatibilityValidation => "restore the broken compatibility guarantees",
        Phase::ProductionReadiness => "finish the production readiness checklist",
    };
    format!("{}: {} ({})", phase.phase, action, phase.status)
}
