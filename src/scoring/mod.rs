//! Weighted score aggregation and grading
//!
//! Converts raw analyzer results into per-category scores and the overall
//! composite. Pure: same input, same scores, any number of calls.
//!
//! # Scoring
//!
//! ```text
//! category.percentage = round(score / max_score * 100)
//! overall.score       = sum(category.score)
//! overall.max_score   = sum(category.max_score)   (100 with the full set)
//! grade               = fixed threshold table over the percentage
//! ```

use crate::models::{grade_from_percentage, AnalyzerResult, CategoryScore, OverallScore};
use chrono::Utc;

/// Output of one calculation pass, input to the results processor
#[derive(Debug, Clone)]
pub struct ScoredResults {
    pub categories: Vec<CategoryScore>,
    pub overall: OverallScore,
}

pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Weight and grade raw analyzer results.
    ///
    /// Category order in the output matches the input order, which the
    /// orchestrator guarantees is registration order.
    pub fn calculate(results: &[AnalyzerResult]) -> ScoredResults {
        let categories: Vec<CategoryScore> = results
            .iter()
            .map(|r| {
                let percentage = if r.max_score > 0.0 {
                    (r.score / r.max_score * 100.0).round()
                } else {
                    0.0
                };
                CategoryScore {
                    key: r.category,
                    name: r.category.display_name().to_string(),
                    score: r.score,
                    max_score: r.max_score,
                    percentage,
                    grade: grade_from_percentage(percentage).to_string(),
                    issues: r.issues.clone(),
                    recommendations: r.recommendations.clone(),
                    error: r.error.clone(),
                }
            })
            .collect();

        let total_score: f64 = categories.iter().map(|c| c.score).sum();
        let total_max: f64 = categories.iter().map(|c| c.max_score).sum();
        // No categories ran: define 0% / F rather than dividing by zero
        let percentage = if total_max > 0.0 {
            (total_score / total_max * 100.0).round()
        } else {
            0.0
        };

        let overall = OverallScore {
            score: total_score,
            max_score: total_max,
            percentage,
            grade: grade_from_percentage(percentage).to_string(),
            has_errors: results.iter().any(|r| r.error.is_some()),
            generated_at: Utc::now(),
        };

        ScoredResults {
            categories,
            overall,
        }
    }
}
