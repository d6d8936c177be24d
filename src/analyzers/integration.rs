//! Integration analysis phase (not yet implemented)
//!
//! Placeholder analyzer for runtime integration checks (exercising real
//! request paths across the refactored layers). Until it lands, the phase
//! reports `NotImplemented`, which the executor turns into a deliberate
//! `Pending` result so the gap stays visible in aggregation instead of
//! vanishing as a silent no-op.

use crate::analyzers::{Analyzer, AnalyzerReport};
use anyhow::Result;

pub struct IntegrationAnalyzer;

impl IntegrationAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IntegrationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for IntegrationAnalyzer {
    fn name(&self) -> &'static str {
        "IntegrationAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Runtime integration checks across refactored layers (pending implementation)"
    }

    fn run(&self) -> Result<AnalyzerReport> {
        Ok(AnalyzerReport::NotImplemented {
            note: "runtime integration checks are not implemented yet".to_string(),
        })
    }
}
