//! Lifecycle observer for audit runs
//!
//! The controller emits its lifecycle events (phase start, phase end, gate
//! decision) through this trait instead of printing, so it stays testable
//! without capturing stdout. The default implementation forwards everything
//! to `tracing`; tests substitute a recording observer.

use crate::models::{AuditResult, Phase, PhaseResult};
use tracing::info;

/// Receives controller lifecycle events during one audit run.
pub trait AuditObserver: Send + Sync {
    fn phase_started(&self, _phase: Phase) {}

    fn phase_completed(&self, _result: &PhaseResult) {}

    /// Emitted once, after all configured phases, with the gate verdict.
    fn gate_decision(&self, _run_gate: bool) {}

    fn audit_finished(&self, _result: &AuditResult) {}
}

/// Default observer: structured log records via `tracing`.
pub struct TracingObserver;

impl AuditObserver for TracingObserver {
    fn phase_started(&self, phase: Phase) {
        info!(%phase, "phase started");
    }

    fn phase_completed(&self, result: &PhaseResult) {
        info!(
            phase = %result.phase,
            status = %result.status,
            duration_ms = result.duration_ms,
            findings = result.findings.len(),
            "phase completed"
        );
    }

    fn gate_decision(&self, run_gate: bool) {
        if run_gate {
            info!("no failed phases; running production readiness gate");
        } else {
            info!("failed phase present; skipping production readiness gate");
        }
    }

    fn audit_finished(&self, result: &AuditResult) {
        info!(
            overall = %result.overall,
            phases = result.phases.len(),
            issues = result.issues.len(),
            total_duration_ms = result.total_duration_ms,
            "audit finished"
        );
    }
}
