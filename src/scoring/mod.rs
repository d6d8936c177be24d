//! Deployment Readiness Scoring
//!
//! Pure derivation of a 0-100 readiness score from one `AuditResult`.
//! Deterministic and side-effect free: re-running it on an unchanged
//! result yields identical output.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = Status + Performance + Compatibility + CriticalIssues
//!
//! Status       (max 40): pass -> 40, warning -> 25, fail/pending -> 0
//! Performance  (max 30): 30 x (thresholds met / 3)
//! Compatibility(max 20): maintained -> 20, partial -> 10, broken -> 0
//! Criticals    (max 10): 0 -> 10, 1-2 -> 5, 3+ -> 0
//!
//! Rounded half-up once at the end, not per component.
//! readiness := score >= 80
//! ```
//!
//! The 90/75 deployment tiers are user-facing language only; they never
//! affect the pass/fail verdict.

mod readiness;

pub use readiness::{deployment_tier, score, summarize, ReadinessScore, ScoreComponents};
