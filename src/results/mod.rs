//! Result validation, recommendation aggregation, and summary shapes
//!
//! The processor sits between scoring and output. It assembles the final
//! `ScoreReport`, checks the cross-component consistency invariants, and
//! derives the compact summary. Violations are reported, never silently
//! corrected: a score-sum mismatch means an aggregation bug upstream and
//! papering over it would hide exactly the failures this check exists for.

use crate::models::{ProjectMetadata, Recommendation, ReportSummary, ScoreReport};
use crate::scoring::ScoredResults;
use serde::Serialize;
use std::collections::HashSet;

/// Tolerance for floating-point score-sum comparison
const SCORE_TOLERANCE: f64 = 0.1;

/// Outcome of consistency validation
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub struct ResultsProcessor;

impl ResultsProcessor {
    /// Assemble the final report from scored results.
    ///
    /// Recommendations from all categories are merged into one list,
    /// sorted by descending impact, then deduplicated on suggestion text.
    /// The sort runs first so the surviving duplicate is the
    /// highest-impact one.
    pub fn build_report(metadata: ProjectMetadata, scored: ScoredResults) -> ScoreReport {
        let recommendations = Self::aggregate_recommendations(&scored);
        ScoreReport {
            metadata,
            categories: scored.categories,
            overall: scored.overall,
            recommendations,
        }
    }

    fn aggregate_recommendations(scored: &ScoredResults) -> Vec<Recommendation> {
        let mut all: Vec<Recommendation> = scored
            .categories
            .iter()
            .flat_map(|c| c.recommendations.iter().cloned())
            .collect();

        // Stable sort keeps category order among equal impacts
        all.sort_by(|a, b| {
            b.impact
                .partial_cmp(&a.impact)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut seen = HashSet::new();
        all.retain(|r| seen.insert(r.suggestion.clone()));
        all
    }

    /// Check the report's consistency invariants.
    pub fn validate(report: &ScoreReport) -> Validation {
        let mut errors = Vec::new();

        if report.categories.is_empty() {
            errors.push("report contains no category scores".to_string());
        }
        if report.metadata.name.is_empty() {
            errors.push("project metadata is missing a name".to_string());
        }

        let score_sum: f64 = report.categories.iter().map(|c| c.score).sum();
        if (score_sum - report.overall.score).abs() > SCORE_TOLERANCE {
            errors.push(format!(
                "category scores sum to {:.2} but overall score is {:.2}",
                score_sum, report.overall.score
            ));
        }

        let max_sum: f64 = report.categories.iter().map(|c| c.max_score).sum();
        if (max_sum - report.overall.max_score).abs() > SCORE_TOLERANCE {
            errors.push(format!(
                "category maxima sum to {:.2} but overall max is {:.2}",
                max_sum, report.overall.max_score
            ));
        }

        for c in &report.categories {
            if c.score < 0.0 || c.score > c.max_score {
                errors.push(format!(
                    "category '{}' score {:.2} is outside [0, {:.2}]",
                    c.key, c.score, c.max_score
                ));
            }
        }

        Validation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Compact summary: enough for a dashboard row or a cache entry
    pub fn summarize(report: &ScoreReport) -> ReportSummary {
        ReportSummary {
            score: report.overall.score,
            max_score: report.overall.max_score,
            percentage: report.overall.percentage,
            grade: report.overall.grade.clone(),
            categories: report.categories.len(),
            has_errors: report.overall.has_errors,
            generated_at: report.overall.generated_at,
        }
    }
}
