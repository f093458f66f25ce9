//! Performance analyzer
//!
//! Heuristic signals only: very large source files, deeply indented hot
//! spots, and oversized static assets shipped with the project.

use crate::analyzers::base::{is_test_path, source_files, Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use serde_json::json;

const HUGE_FILE_LINES: usize = 1500;
/// Indentation depth (spaces) treated as a deep-nesting signal
const DEEP_INDENT: usize = 24;
const LARGE_ASSET_BYTES: u64 = 1_000_000;

pub struct PerformanceAnalyzer;

impl Analyzer for PerformanceAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Performance
    }

    fn description(&self) -> &'static str {
        "Flags huge source files, deep nesting, and oversized assets"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        let max = ctx.max_score;
        let mut huge_files = 0usize;
        let mut deep_lines = 0usize;
        let mut total_lines = 0usize;

        for path in source_files(ctx)? {
            ctx.ensure_active()?;
            if is_test_path(&path) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let lines = content.lines().count();
            total_lines += lines;
            if lines > HUGE_FILE_LINES {
                huge_files += 1;
            }
            deep_lines += content
                .lines()
                .filter(|l| indent_width(l) >= DEEP_INDENT && !l.trim().is_empty())
                .count();
        }

        let large_assets = count_large_assets(ctx)?;

        let mut penalty = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        if huge_files > 0 {
            let p = (huge_files as f64 * 0.10).min(0.25);
            penalty += p;
            issues.push(format!(
                "{} source files exceed {} lines",
                huge_files, HUGE_FILE_LINES
            ));
            recs.push(Recommendation {
                suggestion: "Break up very large source files".to_string(),
                description: "Files this large are slow to parse, slow to review, and \
                              usually hide monolithic hot paths."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        let deep_ratio = if total_lines > 0 {
            deep_lines as f64 / total_lines as f64
        } else {
            0.0
        };
        if deep_ratio > 0.05 {
            let p = ((deep_ratio - 0.05) * 4.0).min(0.35);
            penalty += p;
            issues.push(format!(
                "{:.1}% of lines sit at deep nesting levels",
                deep_ratio * 100.0
            ));
            recs.push(Recommendation {
                suggestion: "Flatten deeply nested control flow".to_string(),
                description: "Heavy nesting often marks loops-in-loops and branching that \
                              dominates runtime; extract helpers or invert conditions."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        if large_assets > 0 {
            let p = (large_assets as f64 * 0.05).min(0.20);
            penalty += p;
            issues.push(format!("{} assets larger than 1 MB", large_assets));
            recs.push(Recommendation {
                suggestion: "Compress or externalize large assets".to_string(),
                description: "Multi-megabyte assets inflate installs and load time; serve \
                              them from storage or a CDN instead."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        let score = max * (1.0 - penalty).max(0.0);
        let mut result = AnalyzerResult::success(self.key(), score, max);
        result.issues = issues;
        result.recommendations = recs;
        result = result
            .with_metric("huge_files", json!(huge_files))
            .with_metric("deep_nesting_ratio", json!(deep_ratio))
            .with_metric("large_assets", json!(large_assets));
        Ok(result)
    }
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

fn count_large_assets(ctx: &AnalyzerContext) -> Result<usize> {
    let mut count = 0;
    for entry in ignore::WalkBuilder::new(&ctx.root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        ctx.ensure_active()?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            if meta.len() > LARGE_ASSET_BYTES {
                count += 1;
            }
        }
    }
    Ok(count)
}
