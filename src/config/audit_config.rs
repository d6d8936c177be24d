//! Audit configuration support
//!
//! Loads per-project configuration from `refaudit.toml` or
//! `.refauditrc.json` in the repository root.
//!
//! # Configuration Format
//!
//! ```toml
//! # refaudit.toml
//!
//! phases = [
//!     "static-analysis",
//!     "integration-analysis",
//!     "performance-validation",
//!     "compatibility-validation",
//! ]
//!
//! [thresholds]
//! bundle_size_reduction_min = 20.0
//! response_time_improvement_min = 15.0
//! memory_reduction_min = 10.0
//! compilation_time_improvement_min = 30.0
//!
//! [compatibility]
//! zero_breaking_changes = true
//! backward_compatibility = true
//! api_contract_preservation = true
//!
//! [reporting]
//! format = "text"
//! include_executive_summary = true
//! include_phase_details = true
//! ```

use crate::models::Phase;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors a configuration can carry into an audit run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no phases configured")]
    NoPhases,

    #[error("production-readiness is gate-controlled and cannot be configured as a phase")]
    GatePhaseConfigured,

    #[error("threshold {name} must be a non-negative percentage, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Minimum percentage improvements the performance phase must observe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub bundle_size_reduction_min: f64,
    pub response_time_improvement_min: f64,
    pub memory_reduction_min: f64,
    pub compilation_time_improvement_min: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bundle_size_reduction_min: 20.0,
            response_time_improvement_min: 15.0,
            memory_reduction_min: 10.0,
            compilation_time_improvement_min: 30.0,
        }
    }
}

/// Compatibility guarantees the audit enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityPolicy {
    pub zero_breaking_changes: bool,
    pub backward_compatibility: bool,
    pub api_contract_preservation: bool,
}

impl Default for CompatibilityPolicy {
    fn default() -> Self {
        Self {
            zero_breaking_changes: true,
            backward_compatibility: true,
            api_contract_preservation: true,
        }
    }
}

/// Where and how the final report is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingPolicy {
    /// Output format: text, json, markdown (or md)
    pub format: String,
    /// Output file path (stdout when unset)
    pub output_path: Option<PathBuf>,
    pub include_executive_summary: bool,
    pub include_phase_details: bool,
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            output_path: None,
            include_executive_summary: true,
            include_phase_details: true,
        }
    }
}

/// Validated audit configuration. Immutable once handed to the controller;
/// overrides are merged via [`AuditConfigOverlay`], never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Phases to run, in order. Duplicates run twice.
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub compatibility: CompatibilityPolicy,
    #[serde(default)]
    pub reporting: ReportingPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            phases: Phase::default_sequence(),
            thresholds: Thresholds::default(),
            compatibility: CompatibilityPolicy::default(),
            reporting: ReportingPolicy::default(),
        }
    }
}

impl AuditConfig {
    /// Check the configuration is runnable.
    ///
    /// The production-readiness phase is appended by the controller when the
    /// gate condition holds; user configuration may never request it
    /// directly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::NoPhases);
        }
        if self.phases.contains(&Phase::ProductionReadiness) {
            return Err(ConfigError::GatePhaseConfigured);
        }
        for (name, value) in [
            ("bundle_size_reduction_min", self.thresholds.bundle_size_reduction_min),
            (
                "response_time_improvement_min",
                self.thresholds.response_time_improvement_min,
            ),
            ("memory_reduction_min", self.thresholds.memory_reduction_min),
            (
                "compilation_time_improvement_min",
                self.thresholds.compilation_time_improvement_min,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// Partial configuration used for structural overlay merges.
///
/// Every field is optional; `apply` lays the overlay over a base config and
/// returns a new value, leaving the base untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfigOverlay {
    pub phases: Option<Vec<Phase>>,
    pub thresholds: Option<Thresholds>,
    pub compatibility: Option<CompatibilityPolicy>,
    pub reporting: Option<ReportingOverlay>,
}

/// Overlay for the reporting section, field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportingOverlay {
    pub format: Option<String>,
    pub output_path: Option<PathBuf>,
    pub include_executive_summary: Option<bool>,
    pub include_phase_details: Option<bool>,
}

impl AuditConfigOverlay {
    /// Merge this overlay over `base`, producing a new configuration.
    pub fn apply(self, base: &AuditConfig) -> AuditConfig {
        let mut merged = base.clone();
        if let Some(phases) = self.phases {
            merged.phases = phases;
        }
        if let Some(thresholds) = self.thresholds {
            merged.thresholds = thresholds;
        }
        if let Some(compatibility) = self.compatibility {
            merged.compatibility = compatibility;
        }
        if let Some(reporting) = self.reporting {
            if let Some(format) = reporting.format {
                merged.reporting.format = format;
            }
            if let Some(path) = reporting.output_path {
                merged.reporting.output_path = Some(path);
            }
            if let Some(v) = reporting.include_executive_summary {
                merged.reporting.include_executive_summary = v;
            }
            if let Some(v) = reporting.include_phase_details {
                merged.reporting.include_phase_details = v;
            }
        }
        merged
    }
}

/// Load audit configuration for a repository, falling back to defaults.
///
/// Tries `refaudit.toml` first, then `.refauditrc.json`. A file that fails
/// to parse is reported and skipped rather than aborting the run.
pub fn load_audit_config(repo_path: &Path) -> AuditConfig {
    let defaults = AuditConfig::default();

    let toml_path = repo_path.join("refaudit.toml");
    if toml_path.exists() {
        match load_toml_overlay(&toml_path) {
            Ok(overlay) => {
                debug!("Loaded audit config from {}", toml_path.display());
                return overlay.apply(&defaults);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = repo_path.join(".refauditrc.json");
    if json_path.exists() {
        match load_json_overlay(&json_path) {
            Ok(overlay) => {
                debug!("Loaded audit config from {}", json_path.display());
                return overlay.apply(&defaults);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No audit config found, using defaults");
    defaults
}

fn load_toml_overlay(path: &Path) -> Result<AuditConfigOverlay> {
    let content = std::fs::read_to_string(path)?;
    let overlay: AuditConfigOverlay = toml::from_str(&content)?;
    Ok(overlay)
}

fn load_json_overlay(path: &Path) -> Result<AuditConfigOverlay> {
    let content = std::fs::read_to_string(path)?;
    let overlay: AuditConfigOverlay = serde_json::from_str(&content)?;
    Ok(overlay)
}
