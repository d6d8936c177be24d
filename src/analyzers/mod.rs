//! Analyzer trait and result shapes
//!
//! This module defines the boundary between the audit engine and the
//! analyzers it drives:
//! - `Analyzer` trait that all analyzers implement
//! - `AnalyzerReport` tagged union with exactly the fields the controller
//!   reads; analyzer-internal detail stays behind opaque evidence payloads
//! - `AnalyzerSet` mapping each phase to its backing analyzer
//!
//! Analyzers are stateless, reentrant, and read-only with respect to the
//! target tree. Each `run()` call either returns a structurally complete
//! report or a single error value; partial results are not part of the
//! contract.

mod compatibility;
mod integration;
mod performance;
mod production_readiness;
mod static_analysis;

pub use compatibility::CompatibilityAnalyzer;
pub use integration::IntegrationAnalyzer;
pub use performance::PerformanceAnalyzer;
pub use production_readiness::ProductionReadinessAnalyzer;
pub use static_analysis::StaticAnalyzer;

use crate::config::AuditConfig;
use crate::models::{Finding, IssueSeverity, Phase};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// An issue reported from inside an analyzer, before the controller
/// promotes it to a tracked `AuditIssue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerIssue {
    /// Analyzer-specific issue kind (e.g. "type-annotation", "error-shape")
    pub kind: String,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(default)]
    pub location: String,
}

/// Report of the static integration checks: type coherence, cross-layer
/// consistency, and the auth/error wiring between layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub type_system_coherence: bool,
    pub cross_layer_consistency: bool,
    pub authentication_integration: bool,
    pub error_handling_chain: bool,
    pub issues: Vec<AnalyzerIssue>,
}

/// Report of measured performance deltas against the recorded baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub gains: crate::models::PerformanceGains,
    /// Tracked for reporting only; not part of the pass/fail thresholds.
    pub compilation_time_improvement: f64,
    pub findings: Vec<Finding>,
}

/// Report of the compatibility sub-checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub api_contract_ok: bool,
    pub backward_compatibility_ok: bool,
    pub error_response_issues: Vec<AnalyzerIssue>,
    pub authentication_issues: Vec<AnalyzerIssue>,
    pub database_issues: Vec<AnalyzerIssue>,
    pub findings: Vec<Finding>,
}

/// Report of the final production-readiness checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionReadinessReport {
    pub overall_readiness: bool,
    pub readiness_score: f64,
    pub findings: Vec<Finding>,
}

/// Self-contained result of one analyzer invocation.
///
/// The controller only ever branches on the fields enumerated here; it
/// never introspects analyzer internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "analyzer", rename_all = "kebab-case")]
pub enum AnalyzerReport {
    Integration(IntegrationReport),
    Performance(PerformanceReport),
    Compatibility(CompatibilityReport),
    ProductionReadiness(ProductionReadinessReport),
    /// Explicit placeholder for an analyzer that exists in the pipeline but
    /// has no implementation yet. Propagates as `Pending`, deliberately,
    /// rather than disappearing as a silent no-op.
    NotImplemented { note: String },
}

impl AnalyzerReport {
    /// Findings carried by this report, if the variant produces any.
    pub fn findings(&self) -> &[Finding] {
        match self {
            AnalyzerReport::Performance(r) => &r.findings,
            AnalyzerReport::Compatibility(r) => &r.findings,
            AnalyzerReport::ProductionReadiness(r) => &r.findings,
            AnalyzerReport::Integration(_) | AnalyzerReport::NotImplemented { .. } => &[],
        }
    }
}

/// Trait for all audit analyzers
///
/// Analyzers take no pipeline state: each invocation is independent and
/// returns a self-contained report. Errors are allowed to escape `run`;
/// the phase executor contains them so one failing analyzer never aborts
/// the run.
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer (e.g. "StaticAnalyzer")
    fn name(&self) -> &'static str;

    /// Human-readable description of what this analyzer checks
    fn description(&self) -> &'static str;

    /// Run the analysis and return a structurally complete report.
    fn run(&self) -> Result<AnalyzerReport>;
}

/// Maps each phase tag to the analyzer that backs it.
#[derive(Default)]
pub struct AnalyzerSet {
    analyzers: HashMap<Phase, Arc<dyn Analyzer>>,
}

impl AnalyzerSet {
    /// Create an empty set. Mostly useful for tests that register mocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the analyzer backing a phase, replacing any previous one.
    pub fn register(&mut self, phase: Phase, analyzer: Arc<dyn Analyzer>) {
        self.analyzers.insert(phase, analyzer);
    }

    /// Look up the analyzer for a phase.
    pub fn get(&self, phase: Phase) -> Option<&Arc<dyn Analyzer>> {
        self.analyzers.get(&phase)
    }

    /// Number of registered analyzers.
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Build the standard analyzer set for a target repository.
    pub fn for_target(target: &Path, config: &AuditConfig) -> Self {
        let mut set = Self::new();
        set.register(
            Phase::StaticAnalysis,
            Arc::new(StaticAnalyzer::new(target.to_path_buf())),
        );
        set.register(
            Phase::IntegrationAnalysis,
            Arc::new(IntegrationAnalyzer::new()),
        );
        set.register(
            Phase::PerformanceValidation,
            Arc::new(PerformanceAnalyzer::new(
                target.to_path_buf(),
                config.thresholds,
            )),
        );
        set.register(
            Phase::CompatibilityValidation,
            Arc::new(CompatibilityAnalyzer::new(
                target.to_path_buf(),
                config.compatibility,
            )),
        );
        set.register(
            Phase::ProductionReadiness,
            Arc::new(ProductionReadinessAnalyzer::new(target.to_path_buf())),
        );
        set
    }
}

/// Walk source files under a target, honoring .gitignore.
///
/// Shared by the filesystem-facing analyzers.
pub(crate) fn source_files(target: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    for entry in ignore::WalkBuilder::new(target)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        if entry.file_type().is_some_and(|t| t.is_file()) {
            let path = entry.into_path();
            let is_source = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| {
                    matches!(
                        ext,
                        "rs" | "ts" | "tsx" | "js" | "jsx" | "py" | "go" | "java" | "cs"
                    )
                });
            if is_source {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
