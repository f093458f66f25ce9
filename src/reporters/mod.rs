//! Output reporters for score reports
//!
//! Supports three output formats:
//! - `console` - terminal output with colors
//! - `json` - machine-readable JSON of the full report
//! - `html` - standalone HTML report
//!
//! Every renderer consumes the same validated `ScoreReport`; none of them
//! recompute scores.

mod html;
mod json;
mod text;

use crate::models::ScoreReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "text" | "terminal" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: console, json, html",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Console => write!(f, "console"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

/// Per-render display options (console only; json/html always show all)
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Show per-category issues
    pub detailed: bool,
    /// Show the ranked recommendation list
    pub recommendations: bool,
}

/// Render a score report in the specified format
pub fn render(report: &ScoreReport, format: OutputFormat, opts: RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Console => text::render(report, opts),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => html::render(report),
    }
}
