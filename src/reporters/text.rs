//! Console reporter with colors and formatting

use super::RenderOptions;
use crate::models::ScoreReport;
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade.chars().next() {
        Some('A') => "\x1b[32m", // Green
        Some('B') => "\x1b[92m", // Light green
        Some('C') => "\x1b[33m", // Yellow
        Some('D') => "\x1b[91m", // Light red
        _ => "\x1b[31m",         // Red
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render report as formatted terminal output
pub fn render(report: &ScoreReport, opts: RenderOptions) -> Result<String> {
    let mut out = String::new();

    let meta = &report.metadata;
    let grade_c = grade_color(&report.overall.grade);
    out.push_str(&format!("\n{BOLD}Scorecard{RESET}  {DIM}{}{}  ({}){RESET}\n",
        meta.name,
        meta.version
            .as_deref()
            .map(|v| format!(" v{}", v))
            .unwrap_or_default(),
        meta.kind
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/{:.0}{RESET}  Grade: {grade_c}{BOLD}{}{RESET}  ({:.0}%)\n",
        report.overall.score, report.overall.max_score, report.overall.grade,
        report.overall.percentage
    ));
    if report.overall.has_errors {
        out.push_str(&format!(
            "\x1b[91mSome analyzers failed; affected categories scored 0.{RESET}\n"
        ));
    }
    out.push('\n');

    // Category table
    out.push_str(&format!(
        "{DIM}  CATEGORY                SCORE     GRADE{RESET}\n"
    ));
    out.push_str(&format!(
        "{DIM}  ─────────────────────────────────────────{RESET}\n"
    ));
    for c in &report.categories {
        let c_color = grade_color(&c.grade);
        out.push_str(&format!(
            "  {:<22} {:>5.1}/{:<5.1} {c_color}{}{RESET}{}\n",
            c.name,
            c.score,
            c.max_score,
            c.grade,
            if c.error.is_some() {
                format!("  {DIM}(failed){RESET}")
            } else {
                String::new()
            }
        ));
    }
    out.push('\n');

    if opts.detailed {
        for c in &report.categories {
            if c.issues.is_empty() {
                continue;
            }
            out.push_str(&format!("{BOLD}{}{RESET}\n", c.name));
            for issue in &c.issues {
                out.push_str(&format!("  {DIM}-{RESET} {}\n", issue));
            }
            out.push('\n');
        }
    }

    if opts.recommendations && !report.recommendations.is_empty() {
        out.push_str(&format!("{BOLD}RECOMMENDATIONS{RESET} (by impact)\n"));
        for (i, rec) in report.recommendations.iter().take(10).enumerate() {
            out.push_str(&format!(
                "  {DIM}{:>2}.{RESET} {} {DIM}(+{:.1} pts, {}){RESET}\n",
                i + 1,
                rec.suggestion,
                rec.impact,
                rec.category
            ));
        }
        let remaining = report.recommendations.len().saturating_sub(10);
        if remaining > 0 {
            out.push_str(&format!("  {DIM}...and {} more{RESET}\n", remaining));
        }
        out.push('\n');
    }

    // Closing hint based on grade
    match report.overall.grade.chars().next() {
        Some('A') => out.push_str(&format!("{DIM}Excellent shape. Keep it up.{RESET}\n")),
        Some('B') => out.push_str(&format!(
            "{DIM}Good shape. Address remaining issues for an A.{RESET}\n"
        )),
        _ => out.push_str(&format!(
            "{DIM}Run with --detailed --recommendations for the fix list.{RESET}\n"
        )),
    }

    Ok(out)
}
