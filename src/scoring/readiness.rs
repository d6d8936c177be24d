//! Readiness scorer
//!
//! Weighted, additive scoring over the aggregated audit result. Each
//! component is capped at its own maximum and never negative; malformed or
//! missing data scores as the worst case (an absent compatibility phase
//! reads as broken, never as an error).

use crate::models::{
    metric_keys, AuditResult, CompatibilityStatus, ExecutiveSummary, IssueSeverity,
    PerformanceGains, Phase, PhaseStatus,
};
use serde::{Deserialize, Serialize};

const STATUS_MAX: f64 = 40.0;
const STATUS_WARNING: f64 = 25.0;
const PERFORMANCE_MAX: f64 = 30.0;
const COMPATIBILITY_MAX: f64 = 20.0;
const COMPATIBILITY_PARTIAL: f64 = 10.0;
const CRITICALS_MAX: f64 = 10.0;
const CRITICALS_SOME: f64 = 5.0;

/// Fixed readiness gate. Distinct from the 90/75 display tiers.
const READINESS_THRESHOLD: u32 = 80;

/// Unrounded component contributions, kept for report transparency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub status: f64,
    pub performance: f64,
    pub compatibility: f64,
    pub critical_issues: f64,
}

/// Derived readiness verdict for one audit result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    /// Weighted score, integer in [0, 100]
    pub score: u32,
    /// True iff score >= 80
    pub readiness: bool,
    pub compatibility: CompatibilityStatus,
    pub components: ScoreComponents,
}

/// Compute the readiness score for an audit result.
pub fn score(result: &AuditResult) -> ReadinessScore {
    let status = match result.overall {
        PhaseStatus::Pass => STATUS_MAX,
        PhaseStatus::Warning => STATUS_WARNING,
        PhaseStatus::Fail | PhaseStatus::Pending => 0.0,
    };

    let thresholds_met = result
        .phase(Phase::PerformanceValidation)
        .and_then(|p| p.metric(metric_keys::THRESHOLDS_MET))
        .unwrap_or(0.0)
        .clamp(0.0, 3.0);
    let performance = PERFORMANCE_MAX * (thresholds_met / 3.0);

    let compatibility_status = classify_compatibility(result);
    let compatibility = match compatibility_status {
        CompatibilityStatus::Maintained => COMPATIBILITY_MAX,
        CompatibilityStatus::Partial => COMPATIBILITY_PARTIAL,
        CompatibilityStatus::Broken => 0.0,
    };

    let critical_issues = match result.issue_count(IssueSeverity::Critical) {
        0 => CRITICALS_MAX,
        1 | 2 => CRITICALS_SOME,
        _ => 0.0,
    };

    let components = ScoreComponents {
        status,
        performance,
        compatibility,
        critical_issues,
    };

    // Round half-up once, over the summed total.
    let total = status + performance + compatibility + critical_issues;
    let score = (total + 0.5).floor().clamp(0.0, 100.0) as u32;

    ReadinessScore {
        score,
        readiness: score >= READINESS_THRESHOLD,
        compatibility: compatibility_status,
        components,
    }
}

/// Compatibility classification from the compatibility phase status.
/// An absent phase is the worst case: broken, not an error.
fn classify_compatibility(result: &AuditResult) -> CompatibilityStatus {
    match result.phase(Phase::CompatibilityValidation).map(|p| p.status) {
        Some(PhaseStatus::Pass) => CompatibilityStatus::Maintained,
        Some(PhaseStatus::Warning) => CompatibilityStatus::Partial,
        Some(PhaseStatus::Fail) | Some(PhaseStatus::Pending) | None => {
            CompatibilityStatus::Broken
        }
    }
}

/// User-facing deployment tier for a score. Display language only.
pub fn deployment_tier(score: u32) -> &'static str {
    match score {
        s if s >= 90 => "production ready",
        s if s >= 75 => "mostly ready",
        _ => "not ready",
    }
}

/// Build the executive summary for a result. Derived state, recomputed on
/// demand; reproducible from the `AuditResult` alone.
pub fn summarize(result: &AuditResult) -> ExecutiveSummary {
    let readiness = score(result);

    let performance_gains = result.phase(Phase::PerformanceValidation).map(|p| {
        let thresholds_met = p.metric(metric_keys::THRESHOLDS_MET).unwrap_or(0.0);
        PerformanceGains {
            bundle_size_reduction: p.metric(metric_keys::BUNDLE_SIZE_REDUCTION).unwrap_or(0.0),
            response_time_improvement: p
                .metric(metric_keys::RESPONSE_TIME_IMPROVEMENT)
                .unwrap_or(0.0),
            memory_reduction: p.metric(metric_keys::MEMORY_REDUCTION).unwrap_or(0.0),
            meets_thresholds: thresholds_met >= 3.0,
        }
    });

    ExecutiveSummary {
        overall_status: result.overall,
        critical_issues: result.issue_count(IssueSeverity::Critical),
        warning_issues: result.phase_count(PhaseStatus::Warning),
        performance_gains,
        compatibility_status: readiness.compatibility,
        recommendations: result.recommendations.iter().take(5).cloned().collect(),
        readiness_score: readiness.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhaseResult;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn phase_result(phase: Phase, status: PhaseStatus) -> PhaseResult {
        PhaseResult {
            phase,
            status,
            metrics: BTreeMap::new(),
            findings: Vec::new(),
            duration_ms: 1,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    fn result_with(phases: Vec<PhaseResult>, overall: PhaseStatus) -> AuditResult {
        AuditResult {
            overall,
            phases,
            aggregated_metrics: BTreeMap::new(),
            issues: Vec::new(),
            recommendations: Vec::new(),
            timestamp: Utc::now(),
            total_duration_ms: 1,
        }
    }

    fn perf_phase(met: f64) -> PhaseResult {
        let mut p = phase_result(Phase::PerformanceValidation, PhaseStatus::Pass);
        p.metrics
            .insert(metric_keys::THRESHOLDS_MET.to_string(), met);
        p
    }

    #[test]
    fn test_perfect_run_scores_100() {
        let result = result_with(
            vec![
                phase_result(Phase::StaticAnalysis, PhaseStatus::Pass),
                perf_phase(3.0),
                phase_result(Phase::CompatibilityValidation, PhaseStatus::Pass),
                phase_result(Phase::ProductionReadiness, PhaseStatus::Pass),
            ],
            PhaseStatus::Pass,
        );
        let s = score(&result);
        assert_eq!(s.score, 100);
        assert!(s.readiness);
        assert_eq!(s.compatibility, CompatibilityStatus::Maintained);
    }

    #[test]
    fn test_partial_thresholds_scale_performance_component() {
        let result = result_with(
            vec![perf_phase(2.0), phase_result(Phase::CompatibilityValidation, PhaseStatus::Pass)],
            PhaseStatus::Warning,
        );
        let s = score(&result);
        // 25 + 20 + 20 + 10 = 75
        assert_eq!(s.components.performance, 20.0);
        assert_eq!(s.score, 75);
        assert!(!s.readiness);
    }

    #[test]
    fn test_absent_compatibility_phase_is_broken() {
        let result = result_with(vec![perf_phase(3.0)], PhaseStatus::Pass);
        let s = score(&result);
        assert_eq!(s.compatibility, CompatibilityStatus::Broken);
        assert_eq!(s.components.compatibility, 0.0);
        // 40 + 30 + 0 + 10 = 80: still at the readiness gate
        assert_eq!(s.score, 80);
        assert!(s.readiness);
    }

    #[test]
    fn test_critical_issue_bands() {
        let mut result = result_with(vec![], PhaseStatus::Pass);
        assert_eq!(score(&result).components.critical_issues, 10.0);

        let critical = crate::models::AuditIssue {
            issue_type: crate::models::IssueType::ConfigurationError,
            severity: IssueSeverity::Critical,
            message: "m".into(),
            location: String::new(),
            evidence: serde_json::Value::Null,
            recommendation: None,
            phase: None,
        };
        result.issues = vec![critical.clone(), critical.clone()];
        assert_eq!(score(&result).components.critical_issues, 5.0);

        result.issues.push(critical);
        assert_eq!(score(&result).components.critical_issues, 0.0);
    }

    #[test]
    fn test_scorer_is_idempotent_and_bounded() {
        let result = result_with(
            vec![
                perf_phase(1.0),
                phase_result(Phase::CompatibilityValidation, PhaseStatus::Warning),
            ],
            PhaseStatus::Warning,
        );
        let first = score(&result);
        let second = score(&result);
        assert_eq!(first, second);
        assert!(first.score <= 100);
    }

    #[test]
    fn test_readiness_gate_is_exactly_80() {
        // 40 + 30 + 0 + 10 = 80 -> ready
        let at_gate = result_with(vec![perf_phase(3.0)], PhaseStatus::Pass);
        assert!(score(&at_gate).readiness);

        // 40 + 20 + 0 + 10 = 70 -> not ready
        let below = result_with(vec![perf_phase(2.0)], PhaseStatus::Pass);
        assert!(!score(&below).readiness);
    }

    #[test]
    fn test_rounding_applies_once_at_the_end() {
        // A fractional metric forces a fractional component:
        // 30 * (0.5/3) = 5.0 -> 25 + 5 + 0 + 10 = 40.
        let result = result_with(vec![perf_phase(0.5)], PhaseStatus::Warning);
        assert_eq!(score(&result).score, 40);
    }

    #[test]
    fn test_deployment_tiers_are_display_only() {
        assert_eq!(deployment_tier(95), "production ready");
        assert_eq!(deployment_tier(80), "mostly ready");
        assert_eq!(deployment_tier(74), "not ready");
    }

    #[test]
    fn test_summary_reproducible_from_result() {
        let result = result_with(
            vec![
                perf_phase(2.0),
                phase_result(Phase::CompatibilityValidation, PhaseStatus::Warning),
            ],
            PhaseStatus::Warning,
        );
        let a = summarize(&result);
        let b = summarize(&result);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.compatibility_status, CompatibilityStatus::Partial);
        assert_eq!(a.warning_issues, 1);
    }
}
