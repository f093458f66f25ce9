//! JSON reporter
//!
//! Outputs the full ScoreReport as pretty-printed JSON for machine
//! consumption, piping to jq, or further processing.

use crate::models::ScoreReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &ScoreReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
