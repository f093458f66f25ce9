//! Score command - run the analyzers and render the score report

use super::pipeline::{self, collect};
use crate::config;
use crate::reporters::{self, OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub(crate) fn run(
    path: &Path,
    workers: Option<usize>,
    categories: &str,
    format: Option<&str>,
    output: Option<&Path>,
    detailed: bool,
    recommendations: bool,
    timeout: Option<u64>,
) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let file_config = config::load_config(&root)?;
    let format: OutputFormat = format
        .map(str::to_string)
        .or_else(|| file_config.defaults.format.clone())
        .unwrap_or_else(|| "console".to_string())
        .parse()?;
    let workers = pipeline::resolve_workers(workers, &file_config);
    let timeout = pipeline::resolve_timeout(timeout, &file_config);

    // Progress bar only for terminal output going to stdout
    let show_progress = format == OutputFormat::Console && output.is_none();
    let out = collect(&root, &file_config, categories, workers, timeout, show_progress)?;

    let rendered = reporters::render(
        &out.report,
        format,
        RenderOptions {
            detailed,
            recommendations,
        },
    )?;
    pipeline::emit(&rendered, output)?;

    // The report is always emitted first; a broken invariant still fails the run
    if !pipeline::report_validation(&out.validation) {
        std::process::exit(1);
    }
    Ok(())
}
