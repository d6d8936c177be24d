//! Performance validation phase
//!
//! Compares the current tree against a recorded baseline
//! (`.refaudit/baseline.json`) and reports percentage improvements for
//! bundle size, response time, memory, and compilation time. Bundle size is
//! measured directly from the source tree; the other measurements come from
//! `.refaudit/measurements.json`, written by whatever benchmark harness the
//! project uses.
//!
//! Without a baseline there is nothing to compare against: all gains read
//! as zero and the phase lands on `Warning` (thresholds unmet), never
//! `Fail`. Performance shortfalls are reported, not fatal.

use crate::analyzers::{source_files, Analyzer, AnalyzerReport, PerformanceReport};
use crate::config::Thresholds;
use crate::models::{Finding, Impact, PerformanceGains};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Recorded measurements, either baseline or current.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Measurements {
    pub bundle_size_bytes: u64,
    pub response_time_ms: f64,
    pub memory_mb: f64,
    pub compilation_time_s: f64,
}

/// Percentage improvement from `base` to `current` (positive = better,
/// i.e. smaller). Zero when the baseline is zero.
fn improvement_pct(base: f64, current: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    (base - current) / base * 100.0
}

pub struct PerformanceAnalyzer {
    target: PathBuf,
    thresholds: Thresholds,
}

impl PerformanceAnalyzer {
    pub fn new(target: impl Into<PathBuf>, thresholds: Thresholds) -> Self {
        Self {
            target: target.into(),
            thresholds,
        }
    }

    fn load_measurements(&self, name: &str) -> Result<Option<Measurements>> {
        let path = self.target.join(".refaudit").join(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let measurements: Measurements = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(measurements))
    }

    /// Total bytes of source files in the tree, used as the bundle proxy
    /// when no measured bundle size is recorded.
    fn measured_bundle_size(&self) -> u64 {
        source_files(&self.target)
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum()
    }

    fn gain_finding(name: &str, gain: f64, min: f64) -> Finding {
        let met = gain >= min;
        Finding {
            category: "performance".into(),
            description: format!("{name}: {gain:.1}% improvement (threshold {min:.1}%)"),
            impact: if met { Impact::Positive } else { Impact::Negative },
            evidence: serde_json::json!({ "improvement_pct": gain, "threshold_pct": min }),
            recommendation: if met {
                None
            } else {
                Some(format!("improve {name} to reach the {min:.1}% threshold"))
            },
        }
    }
}

impl Analyzer for PerformanceAnalyzer {
    fn name(&self) -> &'static str {
        "PerformanceAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Validates bundle size, response time, and memory gains against thresholds"
    }

    fn run(&self) -> Result<AnalyzerReport> {
        let baseline = self.load_measurements("baseline.json")?;

        let Some(baseline) = baseline else {
            debug!("no performance baseline recorded; gains read as zero");
            return Ok(AnalyzerReport::Performance(PerformanceReport {
                gains: PerformanceGains::default(),
                compilation_time_improvement: 0.0,
                findings: vec![Finding {
                    category: "performance".into(),
                    description: "no baseline recorded at .refaudit/baseline.json".into(),
                    impact: Impact::Neutral,
                    evidence: serde_json::Value::Null,
                    recommendation: Some(
                        "record a baseline before the refactor to measure gains".into(),
                    ),
                }],
            }));
        };

        let current = match self.load_measurements("measurements.json")? {
            Some(m) => m,
            // No harness output; at least the bundle can be measured directly.
            None => Measurements {
                bundle_size_bytes: self.measured_bundle_size(),
                ..baseline
            },
        };

        let bundle = improvement_pct(
            baseline.bundle_size_bytes as f64,
            current.bundle_size_bytes as f64,
        );
        let response = improvement_pct(baseline.response_time_ms, current.response_time_ms);
        let memory = improvement_pct(baseline.memory_mb, current.memory_mb);
        let compilation =
            improvement_pct(baseline.compilation_time_s, current.compilation_time_s);

        let meets_thresholds = bundle >= self.thresholds.bundle_size_reduction_min
            && response >= self.thresholds.response_time_improvement_min
            && memory >= self.thresholds.memory_reduction_min;

        let findings = vec![
            Self::gain_finding(
                "bundle size reduction",
                bundle,
                self.thresholds.bundle_size_reduction_min,
            ),
            Self::gain_finding(
                "response time improvement",
                response,
                self.thresholds.response_time_improvement_min,
            ),
            Self::gain_finding(
                "memory reduction",
                memory,
                self.thresholds.memory_reduction_min,
            ),
            Self::gain_finding(
                "compilation time improvement",
                compilation,
                self.thresholds.compilation_time_improvement_min,
            ),
        ];

        debug!(
            bundle, response, memory, compilation, meets_thresholds,
            "performance gains computed"
        );

        Ok(AnalyzerReport::Performance(PerformanceReport {
            gains: PerformanceGains {
                bundle_size_reduction: bundle,
                response_time_improvement: response,
                memory_reduction: memory,
                meets_thresholds,
            },
            compilation_time_improvement: compilation,
            findings,
        }))
    }
}
