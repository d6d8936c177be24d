//! Production readiness gate phase
//!
//! Final checklist run only when every prior phase avoided `Fail`:
//! documentation, tests, CI wiring, and no leftover debug statements.
//! Reports a 0-100 readiness score (fraction of checks passed) alongside
//! the boolean verdict.

use crate::analyzers::{source_files, Analyzer, AnalyzerReport, ProductionReadinessReport};
use crate::models::{Finding, Impact};
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Score at or above which the checklist reads as ready.
const READINESS_CUTOFF: f64 = 70.0;

static DEBUG_STATEMENT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn debug_statement_pattern() -> &'static Regex {
    DEBUG_STATEMENT_PATTERN.get_or_init(|| {
        Regex::new(r"(console\.(log|debug)\(|\bdbg!\(|debugger;|pdb\.set_trace\(\))")
            .expect("valid regex")
    })
}

struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

pub struct ProductionReadinessAnalyzer {
    target: PathBuf,
}

impl ProductionReadinessAnalyzer {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.target.join(n).exists())
    }

    fn has_tests(&self) -> bool {
        if self.has_any(&["tests", "test", "spec", "__tests__"]) {
            return true;
        }
        source_files(&self.target).iter().any(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.contains(".test.") || name.contains(".spec.") || name.ends_with("_test.rs")
        })
    }

    fn debug_statement_locations(&self) -> Vec<String> {
        let mut locations = Vec::new();
        for file in source_files(&self.target) {
            if is_test_path(&file) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                if debug_statement_pattern().is_match(line) {
                    locations.push(format!("{}:{}", file.display(), line_no + 1));
                }
            }
        }
        locations
    }

    fn run_checks(&self) -> Vec<Check> {
        let debug_hits = self.debug_statement_locations();
        vec![
            Check {
                name: "documentation",
                passed: self.has_any(&["README.md", "README.rst", "README.txt", "docs"]),
                detail: "a README or docs/ directory exists".into(),
            },
            Check {
                name: "tests",
                passed: self.has_tests(),
                detail: "a test suite is present".into(),
            },
            Check {
                name: "continuous-integration",
                passed: self.has_any(&[".github/workflows", ".gitlab-ci.yml", ".circleci"]),
                detail: "a CI pipeline is configured".into(),
            },
            Check {
                name: "no-debug-statements",
                passed: debug_hits.is_empty(),
                detail: if debug_hits.is_empty() {
                    "no debug statements in non-test code".into()
                } else {
                    format!("{} debug statement(s), first at {}", debug_hits.len(), debug_hits[0])
                },
            },
            Check {
                name: "dependency-manifest",
                passed: self.has_any(&["Cargo.toml", "package.json", "pyproject.toml", "go.mod"]),
                detail: "a dependency manifest exists".into(),
            },
        ]
    }
}

fn is_test_path(path: &Path) -> bool {
    let p = path.to_string_lossy();
    p.contains("/tests/")
        || p.contains("/test/")
        || p.contains("/__tests__/")
        || p.contains(".test.")
        || p.contains(".spec.")
        || p.ends_with("_test.rs")
}

impl Analyzer for ProductionReadinessAnalyzer {
    fn name(&self) -> &'static str {
        "ProductionReadinessAnalyzer"
    }

    fn description(&self) -> &'static str {
        "Final deployment checklist: docs, tests, CI, and debug hygiene"
    }

    fn run(&self) -> Result<AnalyzerReport> {
        let checks = self.run_checks();
        let passed = checks.iter().filter(|c| c.passed).count();
        let readiness_score = passed as f64 / checks.len() as f64 * 100.0;
        let overall_readiness = readiness_score >= READINESS_CUTOFF;

        let findings = checks
            .iter()
            .map(|check| Finding {
                category: "production-readiness".into(),
                description: format!("{}: {}", check.name, check.detail),
                impact: if check.passed {
                    Impact::Positive
                } else {
                    Impact::Negative
                },
                evidence: serde_json::json!({ "check": check.name, "passed": check.passed }),
                recommendation: if check.passed {
                    None
                } else {
                    Some(format!("address the {} check before deploying", check.name))
                },
            })
            .collect();

        debug!(passed, total = checks.len(), readiness_score, "readiness checklist complete");

        Ok(AnalyzerReport::ProductionReadiness(
            ProductionReadinessReport {
                overall_readiness,
                readiness_score,
                findings,
            },
        ))
    }
}
