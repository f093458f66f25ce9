//! Scorecard - weighted project quality scoring with CI quality gates
//!
//! Runs independent category analyzers over a project tree, aggregates
//! their weighted scores into a composite grade, and evaluates quality
//! gates that can block a deployment pipeline.

// Allow dead code for builder-style helpers kept for API symmetry
#![allow(dead_code)]

mod analyzers;
mod cli;
mod config;
mod gates;
mod models;
mod orchestrator;
mod reporters;
mod results;
mod scoring;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
