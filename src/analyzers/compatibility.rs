//! Compatibility validation phase
//!
//! Verifies the refactor kept its public surface intact:
//! - API contract: every symbol recorded in `.refaudit/api-contract.json`
//!   must still appear somewhere in the source tree
//! - backward compatibility: no breaking-change markers in source
//! - sub-checks: contract entries are bucketed by category
//!   (error-response, authentication, database) so regressions land in the
//!   area they affect
//!
//! Regressions found here are reported, not fatal: the phase lands on
//! `Warning` unless the analyzer itself fails.

use crate::analyzers::{
    source_files, Analyzer, AnalyzerIssue, AnalyzerReport, CompatibilityReport,
};
use crate::config::CompatibilityPolicy;
use crate::models::{Finding, Impact, IssueSeverity};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

static BREAKING_PATTERN: OnceLock<Regex> = OnceLock::new();

fn breaking_pattern() -> &'static Regex {
    BREAKING_PATTERN
        .get_or_init(|| Regex::new(r"(BREAKING[ -]CHANGE|@breaking\b)").expect("valid regex"))
}

/// One entry of the recorded API contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEntry {
    /// Symbol or endpoint name expected to survive the refactor
    pub name: String,
    /// Contract area: "error-response", "authentication", "database",
    /// or anything else (bucketed as general API surface)
    #[serde(default)]
    pub category: String,
}

pub struct CompatibilityAnalyzer {
    target: PathBuf,
    policy: CompatibilityPolicy,
}

impl CompatibilityAnalyzer {
    pub fn new(target: impl Into<PathBuf>, policy: CompatibilityPolicy) -> Self {
        Self {
            target: target.into(),
            policy,
        }
    }

    fn load_contract(&self) -> Result<Vec<ContractEntry>> {
        let path = self.target.join(".refaudit").join("api-contract.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let entries: Vec<ContractEntry> = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(entries)
    }
}

impl Analyzer for CompatibilityAnalyzer {
    fn name(&self) -> &'static str {
        "CompatibilityAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Validates API contract preservation and backward compatibility"
    }

    fn run(&self) -> Result<AnalyzerReport> {
        let files = source_files(&self.target);
        let mut contents = Vec::with_capacity(files.len());
        for file in &files {
            if let Ok(text) = std::fs::read_to_string(file) {
                contents.push((file.to_string_lossy().into_owned(), text));
            }
        }

        // Breaking-change markers anywhere in source
        let mut breaking_markers = Vec::new();
        for (path, text) in &contents {
            for (line_no, line) in text.lines().enumerate() {
                if breaking_pattern().is_match(line) {
                    breaking_markers.push(format!("{}:{}", path, line_no + 1));
                }
            }
        }

        // Contract symbols that disappeared from the tree
        let contract = self.load_contract()?;
        let mut error_response_issues = Vec::new();
        let mut authentication_issues = Vec::new();
        let mut database_issues = Vec::new();
        let mut general_missing = 0usize;
        let mut findings = Vec::new();

        for entry in &contract {
            let survives = contents.iter().any(|(_, text)| text.contains(&entry.name));
            if survives {
                continue;
            }
            let issue = AnalyzerIssue {
                kind: "missing-symbol".into(),
                severity: IssueSeverity::High,
                message: format!("contract symbol '{}' no longer present", entry.name),
                location: String::new(),
            };
            match entry.category.as_str() {
                "error-response" => error_response_issues.push(issue),
                "authentication" => authentication_issues.push(issue),
                "database" => database_issues.push(issue),
                _ => {
                    general_missing += 1;
                    findings.push(Finding {
                        category: "compatibility".into(),
                        description: issue.message.clone(),
                        impact: Impact::Negative,
                        evidence: serde_json::json!({ "symbol": entry.name }),
                        recommendation: Some(
                            "restore the symbol or update the recorded contract".into(),
                        ),
                    });
                }
            }
        }

        let sub_check_issues = error_response_issues.len()
            + authentication_issues.len()
            + database_issues.len()
            + general_missing;

        // A disabled policy makes its check vacuous.
        let api_contract_ok = !self.policy.api_contract_preservation || sub_check_issues == 0;
        let backward_compatibility_ok = !self.policy.zero_breaking_changes
            || (breaking_markers.is_empty() && sub_check_issues == 0);

        for location in &breaking_markers {
            findings.push(Finding {
                category: "compatibility".into(),
                description: format!("breaking-change marker at {location}"),
                impact: Impact::Negative,
                evidence: serde_json::json!({ "location": location }),
                recommendation: Some("document the migration path before deploying".into()),
            });
        }
        if contract.is_empty() {
            findings.push(Finding {
                category: "compatibility".into(),
                description: "no API contract recorded at .refaudit/api-contract.json".into(),
                impact: Impact::Neutral,
                evidence: serde_json::Value::Null,
                recommendation: Some("record the public surface to enable contract checks".into()),
            });
        } else if sub_check_issues == 0 {
            findings.push(Finding {
                category: "compatibility".into(),
                description: format!("all {} contract symbols preserved", contract.len()),
                impact: Impact::Positive,
                evidence: serde_json::json!({ "symbols": contract.len() }),
                recommendation: None,
            });
        }

        debug!(
            contract_entries = contract.len(),
            missing = sub_check_issues,
            breaking_markers = breaking_markers.len(),
            "compatibility scan complete"
        );

        Ok(AnalyzerReport::Compatibility(CompatibilityReport {
            api_contract_ok,
            backward_compatibility_ok,
            error_response_issues,
            authentication_issues,
            database_issues,
            findings,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(
        files: &[(&str, &str)],
        contract: Option<&str>,
    ) -> (tempfile::TempDir, CompatibilityAnalyzer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        if let Some(json) = contract {
            let refaudit = dir.path().join(".refaudit");
            std::fs::create_dir_all(&refaudit).unwrap();
            std::fs::write(refaudit.join("api-contract.json"), json).unwrap();
        }
        let analyzer = CompatibilityAnalyzer::new(dir.path(), CompatibilityPolicy::default());
        (dir, analyzer)
    }

    fn report_of(analyzer: &CompatibilityAnalyzer) -> CompatibilityReport {
        match analyzer.run().unwrap() {
            AnalyzerReport::Compatibility(report) => report,
            other => panic!("unexpected report variant: {other:?}"),
        }
    }

    #[test]
    fn test_preserved_contract_is_compatible() {
        let (_dir, analyzer) = setup(
            &[("api.rs", "pub fn get_user() {}\npub fn list_users() {}\n")],
            Some(r#"[{"name": "get_user", "category": "api"}, {"name": "list_users"}]"#),
        );
        let report = report_of(&analyzer);
        assert!(report.api_contract_ok);
        assert!(report.backward_compatibility_ok);
        assert!(report
            .findings
            .iter()
            .any(|f| f.impact == Impact::Positive));
    }

    #[test]
    fn test_missing_symbol_lands_in_its_category() {
        let (_dir, analyzer) = setup(
            &[("api.rs", "pub fn get_user() {}\n")],
            Some(r#"[{"name": "validate_token", "category": "authentication"}]"#),
        );
        let report = report_of(&analyzer);
        assert!(!report.api_contract_ok);
        assert_eq!(report.authentication_issues.len(), 1);
        assert!(report.error_response_issues.is_empty());
        assert!(report.database_issues.is_empty());
    }

    #[test]
    fn test_breaking_marker_breaks_backward_compat() {
        let (_dir, analyzer) = setup(
            &[("api.rs", "// BREAKING CHANGE: renamed endpoint\npub fn f() {}\n")],
            None,
        );
        let report = report_of(&analyzer);
        assert!(!report.backward_compatibility_ok);
        assert!(report.api_contract_ok);
    }

    #[test]
    fn test_disabled_policy_is_vacuous() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("api.rs"),
            "// BREAKING CHANGE: all new API\n",
        )
        .unwrap();
        let analyzer = CompatibilityAnalyzer::new(
            dir.path(),
            CompatibilityPolicy {
                zero_breaking_changes: false,
                backward_compatibility: false,
                api_contract_preservation: false,
            },
        );
        let report = report_of(&analyzer);
        assert!(report.backward_compatibility_ok);
        assert!(report.api_contract_ok);
    }
}
