//! Code quality analyzer
//!
//! Scans source files for unfinished-work markers, leftover debug output,
//! and oversized files. Test files are excluded: a debug print in a test
//! is noise, not a defect.

use crate::analyzers::base::{is_test_path, source_files, Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

const LONG_FILE_LINES: usize = 400;

static TODO_PATTERN: OnceLock<Regex> = OnceLock::new();
static DEBUG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn todo_pattern() -> &'static Regex {
    TODO_PATTERN.get_or_init(|| Regex::new(r"(?i)\b(TODO|FIXME|HACK|XXX)\b").expect("valid regex"))
}

fn debug_pattern() -> &'static Regex {
    DEBUG_PATTERN.get_or_init(|| {
        Regex::new(r"console\.(log|debug)\(|\bdbg!\(|^\s*print\(|\bvar_dump\(")
            .expect("valid regex")
    })
}

pub struct QualityAnalyzer;

impl Analyzer for QualityAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Quality
    }

    fn description(&self) -> &'static str {
        "Scans for TODO/FIXME markers, debug output, and oversized files"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        let max = ctx.max_score;
        let mut todo_count = 0usize;
        let mut debug_count = 0usize;
        let mut long_files = 0usize;
        let mut scanned = 0usize;

        for path in source_files(ctx)? {
            ctx.ensure_active()?;
            if is_test_path(&path) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            scanned += 1;

            if content.lines().count() > LONG_FILE_LINES {
                long_files += 1;
            }
            for line in content.lines() {
                let trimmed = line.trim_start();
                let is_comment = trimmed.starts_with("//")
                    || trimmed.starts_with('#')
                    || trimmed.starts_with('*')
                    || trimmed.starts_with("/*");
                if is_comment && todo_pattern().is_match(line) {
                    todo_count += 1;
                }
                if debug_pattern().is_match(line) {
                    debug_count += 1;
                }
            }
        }

        let mut penalty = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        if todo_count > 0 {
            let p = (todo_count as f64 * 0.02).min(0.30);
            penalty += p;
            issues.push(format!("{} TODO/FIXME markers in source", todo_count));
            recs.push(Recommendation {
                suggestion: "Resolve or ticket outstanding TODO/FIXME markers".to_string(),
                description: "Task markers left in source are unfinished work nobody is \
                              tracking."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        if debug_count > 0 {
            let p = (debug_count as f64 * 0.02).min(0.25);
            penalty += p;
            issues.push(format!("{} debug print statements", debug_count));
            recs.push(Recommendation {
                suggestion: "Remove debug print statements".to_string(),
                description: "console.log/print debugging left in production code leaks \
                              into logs and output."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        if long_files > 0 {
            let p = (long_files as f64 * 0.05).min(0.30);
            penalty += p;
            issues.push(format!(
                "{} files exceed {} lines",
                long_files, LONG_FILE_LINES
            ));
            recs.push(Recommendation {
                suggestion: "Split oversized source files".to_string(),
                description: "Files past a few hundred lines usually bundle several \
                              responsibilities worth separating."
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
            .with_metric("files_scanned", json!(scanned))
            .with_metric("todo_count", json!(todo_count))
            .with_metric("debug_statements", json!(debug_count))
            .with_metric("long_files", json!(long_files));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::base::tests::test_context;

    #[test]
    fn test_clean_source_scores_full() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n",
        )
        .unwrap();

        let ctx = test_context(dir.path(), 20.0);
        let result = QualityAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.score, 20.0);
    }

    #[test]
    fn test_todos_and_debug_prints_deducted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.js"),
            "// TODO: rewrite\nfunction f() {\n  console.log('here');\n}\n// FIXME: broken\n",
        )
        .unwrap();

        let ctx = test_context(dir.path(), 20.0);
        let result = QualityAnalyzer.analyze(&ctx).unwrap();
        assert!(result.score < 20.0);
        assert_eq!(result.metrics["todo_count"], json!(2));
        assert_eq!(result.metrics["debug_statements"], json!(1));
    }

    #[test]
    fn test_test_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tests")).unwrap();
        std::fs::write(
            dir.path().join("tests/app.test.js"),
            "// TODO: flaky\nconsole.log('debug');\n",
        )
        .unwrap();

        let ctx = test_context(dir.path(), 20.0);
        let result = QualityAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.score, 20.0);
    }
}
