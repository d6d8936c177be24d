//! Audit pipeline engine
//!
//! Orchestrates one audit run:
//! 1. Validate configuration
//! 2. Execute each configured phase, in order, through the failure-isolating
//!    `PhaseExecutor`
//! 3. Evaluate the production-readiness gate (runs only on a FAIL-free run)
//! 4. Aggregate statuses, metrics, and issues into one `AuditResult`
//!
//! Phases run sequentially and synchronously: the gate must observe the
//! complete set of prior outcomes before deciding whether to run, and log
//! output must interleave deterministically for operators watching a live
//! run.

mod controller;
mod executor;
mod observer;

pub use controller::AuditController;
pub use executor::{ExecutedPhase, PhaseExecutor};
pub use observer::{AuditObserver, TracingObserver};
