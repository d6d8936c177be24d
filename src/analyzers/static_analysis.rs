//! Static analysis phase
//!
//! Single-pass text scan over the target tree checking that the refactor
//! left the layers coherent:
//! - type-system coherence (no type suppressions or escape hatches)
//! - cross-layer consistency (no data access from the presentation layer)
//! - authentication wiring
//! - error handling chain (no swallowed errors)
//!
//! The heuristics here are deliberately simple and pluggable; the pipeline
//! only consumes the booleans and the issue list.

use crate::analyzers::{source_files, Analyzer, AnalyzerIssue, AnalyzerReport, IntegrationReport};
use crate::models::IssueSeverity;
use anyhow::Result;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

static TYPE_ESCAPE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TYPE_SUPPRESSION_PATTERN: OnceLock<Regex> = OnceLock::new();
static DATA_ACCESS_PATTERN: OnceLock<Regex> = OnceLock::new();
static AUTH_PATTERN: OnceLock<Regex> = OnceLock::new();
static SWALLOWED_ERROR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn type_escape_pattern() -> &'static Regex {
    TYPE_ESCAPE_PATTERN.get_or_init(|| {
        Regex::new(r"(:\s*any\b|\bas\s+any\b|#\s*type:\s*ignore)").expect("valid regex")
    })
}

fn type_suppression_pattern() -> &'static Regex {
    TYPE_SUPPRESSION_PATTERN
        .get_or_init(|| Regex::new(r"@ts-(ignore|nocheck|expect-error)").expect("valid regex"))
}

fn data_access_pattern() -> &'static Regex {
    DATA_ACCESS_PATTERN.get_or_init(|| {
        Regex::new(r#"(\bSELECT\s+.+\s+FROM\b|\bdb\.query\(|\bprisma\.|\.execute\(\s*["'])"#)
            .expect("valid regex")
    })
}

fn auth_pattern() -> &'static Regex {
    AUTH_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(authenticate|authorization|requireAuth|auth_middleware|verify_token)")
            .expect("valid regex")
    })
}

fn swallowed_error_pattern() -> &'static Regex {
    SWALLOWED_ERROR_PATTERN.get_or_init(|| {
        Regex::new(r"(catch\s*(\([^)]*\))?\s*\{\s*\}|except[^:\n]*:\s*pass\b)")
            .expect("valid regex")
    })
}

/// Is this file part of the presentation layer (routes, controllers, views)?
fn is_presentation_file(path: &str) -> bool {
    const PRESENTATION_MARKERS: &[&str] =
        &["/routes/", "/controllers/", "/views/", "/pages/", "/handlers/"];
    PRESENTATION_MARKERS.iter().any(|m| path.contains(m))
}

/// Does the tree contain route-like files at all? Auth checks are vacuous
/// for libraries without an HTTP surface.
fn has_http_surface(paths: &[String]) -> bool {
    paths.iter().any(|p| is_presentation_file(p))
}

pub struct StaticAnalyzer {
    target: PathBuf,
}

impl StaticAnalyzer {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Analyzer for StaticAnalyzer {
    fn name(&self) -> &'static str {
        "StaticAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Checks type coherence, layer consistency, auth wiring, and error handling"
    }

    fn run(&self) -> Result<AnalyzerReport> {
        let files = source_files(&self.target);
        let paths: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        let mut issues: Vec<AnalyzerIssue> = Vec::new();
        let mut auth_seen = false;

        for (file, path) in files.iter().zip(paths.iter()) {
            let Ok(content) = std::fs::read_to_string(file) else {
                // Binary or unreadable file, not an analysis failure.
                continue;
            };

            for (line_no, line) in content.lines().enumerate() {
                let location = format!("{}:{}", path, line_no + 1);

                if type_escape_pattern().is_match(line) {
                    issues.push(AnalyzerIssue {
                        kind: "type-annotation".into(),
                        severity: IssueSeverity::Medium,
                        message: format!("type escape hatch: {}", line.trim()),
                        location: location.clone(),
                    });
                }
                if type_suppression_pattern().is_match(line) {
                    issues.push(AnalyzerIssue {
                        kind: "type-suppression".into(),
                        severity: IssueSeverity::High,
                        message: format!("compiler diagnostic suppressed: {}", line.trim()),
                        location: location.clone(),
                    });
                }
                if is_presentation_file(path) && data_access_pattern().is_match(line) {
                    issues.push(AnalyzerIssue {
                        kind: "cross-layer".into(),
                        severity: IssueSeverity::Medium,
                        message: "direct data access from presentation layer".into(),
                        location: location.clone(),
                    });
                }
                if swallowed_error_pattern().is_match(line) {
                    issues.push(AnalyzerIssue {
                        kind: "error-handling".into(),
                        severity: IssueSeverity::Medium,
                        message: "error swallowed without handling".into(),
                        location,
                    });
                }
            }

            if auth_pattern().is_match(&content) {
                auth_seen = true;
            }
        }

        let type_system_coherence = !issues
            .iter()
            .any(|i| i.kind == "type-annotation" || i.kind == "type-suppression");
        let cross_layer_consistency = !issues.iter().any(|i| i.kind == "cross-layer");
        let error_handling_chain = !issues.iter().any(|i| i.kind == "error-handling");
        // Vacuously wired when there is no HTTP surface to protect.
        let authentication_integration = auth_seen || !has_http_surface(&paths);

        debug!(
            files = files.len(),
            issues = issues.len(),
            "static analysis scan complete"
        );

        Ok(AnalyzerReport::Integration(IntegrationReport {
            type_system_coherence,
            cross_layer_consistency,
            authentication_integration,
            error_handling_chain,
            issues,
        }))
    }
}
