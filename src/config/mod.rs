//! Configuration module for Refaudit
//!
//! This module handles:
//! - Project-level configuration (refaudit.toml)
//! - Threshold overrides via structural overlay
//! - Reporting defaults

mod audit_config;

pub use audit_config::{
    load_audit_config, AuditConfig, AuditConfigOverlay, CompatibilityPolicy, ConfigError,
    ReportingPolicy, Thresholds,
};
