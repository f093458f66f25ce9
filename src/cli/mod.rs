//! CLI command definitions and handlers

mod gates;
mod init;
mod pipeline;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-16)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 16 {
        Err("workers cannot exceed 16".to_string())
    } else {
        Ok(n)
    }
}

/// Scorecard - weighted project quality scoring with CI quality gates
#[derive(Parser, Debug)]
#[command(name = "scorecard")]
#[command(
    version,
    about = "Score project quality across weighted categories and gate CI pipelines on the result",
    long_about = "Scorecard runs seven independent analyzers (structure, code quality, \
performance, testing, security, developer experience, completeness), aggregates \
their weighted scores into a composite grade, and evaluates configurable \
pass/warn/fail quality gates that can block a deployment pipeline.\n\n\
Run without a subcommand to score the current directory.",
    after_help = "\
Examples:
  scorecard .                                  Score the current directory
  scorecard score . --format json              JSON output for scripting
  scorecard score . --categories quality,testing --detailed
  scorecard gates . --format github-actions    Gate output for GitHub Actions
  scorecard gates . --blocking false           Report gates without failing CI
  scorecard gates . --thresholds '{\"overall\": {\"min\": 60}}'"
)]
pub struct Cli {
    /// Path to project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Number of parallel workers (1-16)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the project across quality categories
    #[command(after_help = "\
Examples:
  scorecard score .                            Score with all categories
  scorecard score . --categories quality,testing
  scorecard score . --format json -o report.json
  scorecard score . --format html -o report.html
  scorecard score . --detailed --recommendations")]
    Score {
        /// Categories to score: "all" or a comma-separated subset
        #[arg(long, default_value = "all")]
        categories: String,

        /// Output format: console, json, html
        #[arg(long, short = 'f', value_parser = ["console", "json", "html"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Show per-category issues
        #[arg(long)]
        detailed: bool,

        /// Show the ranked recommendation list
        #[arg(long)]
        recommendations: bool,

        /// Overall deadline in seconds; analyzers past it score 0 as cancelled
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Evaluate quality gates and emit CI pipeline output
    #[command(after_help = "\
Examples:
  scorecard gates .                            Auto-detect the CI platform
  scorecard gates . --format github-actions    Step summary + annotations
  scorecard gates . --format gitlab-ci         Code Quality JSON artifact
  scorecard gates . --format jenkins           JUnit-style XML
  scorecard gates . --blocking false           Never fail the pipeline
  scorecard gates . --thresholds '{\"security\": {\"min\": 12, \"block\": true}}'")]
    Gates {
        /// Categories to score: "all" or a comma-separated subset
        #[arg(long, default_value = "all")]
        categories: String,

        /// CI output format: auto, github-actions, gitlab-ci, jenkins, generic, console
        #[arg(long, short = 'f', value_parser = ["auto", "github-actions", "gitlab-ci", "jenkins", "generic", "console"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit non-zero when a blocking gate fails
        #[arg(long, value_parser = ["true", "false"])]
        blocking: Option<String>,

        /// JSON threshold overrides, e.g. '{"overall": {"min": 60, "warn": 75}}'
        #[arg(long)]
        thresholds: Option<String>,

        /// Overall deadline in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Write a commented scorecard.toml with the default configuration
    Init,
}

/// Dispatch the parsed CLI to its command handler
pub fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Score {
        categories: "all".to_string(),
        format: None,
        output: None,
        detailed: false,
        recommendations: false,
        timeout: None,
    });

    match command {
        Commands::Score {
            categories,
            format,
            output,
            detailed,
            recommendations,
            timeout,
        } => score::run(
            &cli.path,
            cli.workers,
            &categories,
            format.as_deref(),
            output.as_deref(),
            detailed,
            recommendations,
            timeout,
        ),
        Commands::Gates {
            categories,
            format,
            output,
            blocking,
            thresholds,
            timeout,
        } => gates::run(
            &cli.path,
            cli.workers,
            &categories,
            format.as_deref(),
            output.as_deref(),
            blocking.as_deref(),
            thresholds.as_deref(),
            timeout,
        ),
        Commands::Init => init::run(&cli.path),
    }
}
