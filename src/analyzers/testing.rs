//! Testing analyzer
//!
//! Scores test presence and the ratio of test files to source files. This
//! is a coverage *signal*, not coverage measurement.

use crate::analyzers::base::{is_test_path, source_files, Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use serde_json::json;

pub struct TestingAnalyzer;

impl Analyzer for TestingAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Testing
    }

    fn description(&self) -> &'static str {
        "Measures test file presence relative to source size"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        let max = ctx.max_score;
        let files = source_files(ctx)?;
        let test_files = files.iter().filter(|p| is_test_path(p)).count();
        let source_count = files.len().saturating_sub(test_files);
        let ratio = if source_count > 0 {
            test_files as f64 / source_count as f64
        } else {
            0.0
        };

        let mut penalty = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        if files.is_empty() {
            // Nothing to test; don't punish an empty or non-code project
        } else if test_files == 0 {
            penalty = 0.70;
            issues.push("No test files found".to_string());
            recs.push(Recommendation {
                suggestion: "Add a test suite".to_string(),
                description: "There are no test files at all; start with tests for the \
                              most-used entry points."
                    .to_string(),
                impact: max * penalty,
                category: self.key(),
            });
        } else if ratio < 0.1 {
            penalty = 0.40;
            issues.push(format!(
                "Only {} test files for {} source files",
                test_files, source_count
            ));
            recs.push(Recommendation {
                suggestion: "Grow the test suite".to_string(),
                description: "Less than one test file per ten source files leaves most \
                              behavior unverified."
                    .to_string(),
                impact: max * penalty,
                category: self.key(),
            });
        } else if ratio < 0.2 {
            penalty = 0.20;
            issues.push(format!(
                "Test coverage signal is thin ({} test files, {} source files)",
                test_files, source_count
            ));
            recs.push(Recommendation {
                suggestion: "Add tests for untested modules".to_string(),
                description: "The test-to-source ratio suggests whole modules have no \
                              companion tests."
                    .to_string(),
                impact: max * penalty,
                category: self.key(),
            });
        }

        let score = max * (1.0 - penalty).max(0.0);
        let mut result = AnalyzerResult::success(self.key(), score, max);
        result.issues = issues;
        result.recommendations = recs;
        result = result
            .with_metric("test_files", json!(test_files))
            .with_metric("source_files", json!(source_count))
            .with_metric("test_ratio", json!(ratio));
        Ok(result)
    }
}
