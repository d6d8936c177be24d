//! Refaudit - Multi-phase refactoring audit pipeline
//!
//! A local-first release gate that answers one question after a large
//! refactor: did we break anything, and are we production-ready?

use anyhow::Result;
use clap::Parser;
use refaudit::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse first so --log-level can seed the filter; RUST_LOG still wins.
    let args = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(args)
}
