//! Refaudit - Multi-phase refactoring audit pipeline
//!
//! Runs a configurable sequence of independent analyzers against a
//! codebase, isolates per-phase failures, aggregates statuses into one
//! verdict, computes a weighted deployment-readiness score, and emits a
//! report.

pub mod analyzers;
pub mod audit;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;
