//! Shared scoring pipeline used by the score and gates commands
//!
//! Phases: load config, build the run config, detect metadata, orchestrate
//! analyzers, calculate scores, assemble and validate the report. Both
//! commands consume the same validated `ScoreReport`; the gates command
//! layers threshold evaluation on top.

use crate::config::{self, RunConfig, ScorecardConfig};
use crate::models::ScoreReport;
use crate::orchestrator::AnalyzerOrchestrator;
use crate::results::{ResultsProcessor, Validation};
use crate::scoring::ScoreCalculator;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub(crate) struct PipelineOutput {
    pub report: ScoreReport,
    pub validation: Validation,
    pub run_config: RunConfig,
}

/// Run the full scoring pipeline for one project.
pub(crate) fn collect(
    root: &Path,
    file_config: &ScorecardConfig,
    categories: &str,
    workers: usize,
    timeout: Option<Duration>,
    show_progress: bool,
) -> Result<PipelineOutput> {
    let requested = config::parse_category_list(categories)?;
    let run_config = RunConfig::build(root, file_config, requested.as_deref(), workers, timeout)?;
    let metadata = config::detect_metadata(root);

    let mut orchestrator = AnalyzerOrchestrator::new();
    let mut bar = None;
    if show_progress {
        let pb = ProgressBar::new(run_config.categories.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        let pb_for_callback = pb.clone();
        orchestrator = orchestrator.with_progress_callback(Box::new(move |key, done, _total| {
            pb_for_callback.set_position(done as u64);
            pb_for_callback.set_message(key.to_string());
        }));
        bar = Some(pb);
    }

    let results = orchestrator.run(&run_config)?;
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let scored = ScoreCalculator::calculate(&results);
    let report = ResultsProcessor::build_report(metadata, scored);
    let validation = ResultsProcessor::validate(&report);

    Ok(PipelineOutput {
        report,
        validation,
        run_config,
    })
}

/// Resolve the effective timeout: CLI flag wins over file config
pub(crate) fn resolve_timeout(
    flag: Option<u64>,
    file_config: &ScorecardConfig,
) -> Option<Duration> {
    flag.or(file_config.defaults.timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Resolve worker count: CLI flag, then file config, then 8
pub(crate) fn resolve_workers(flag: Option<usize>, file_config: &ScorecardConfig) -> usize {
    flag.or(file_config.defaults.workers).unwrap_or(8)
}

/// Write rendered output to a file or stdout
pub(crate) fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Print validation errors to stderr; returns whether the report is valid
pub(crate) fn report_validation(validation: &Validation) -> bool {
    if !validation.is_valid {
        for error in &validation.errors {
            eprintln!("validation error: {}", error);
        }
    }
    validation.is_valid
}
