//! Core data models for Scorecard
//!
//! These models are used throughout the codebase for representing
//! categories, analyzer output, and scored results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The seven built-in scoring categories.
///
/// Category dispatch is a closed enum rather than free-form strings, so an
/// unknown category is a configuration-time error instead of a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Structure,
    Quality,
    Performance,
    Testing,
    Security,
    Devexp,
    Completeness,
}

impl CategoryKey {
    /// All categories in registration order. Output ordering follows this.
    pub fn all() -> [CategoryKey; 7] {
        [
            CategoryKey::Structure,
            CategoryKey::Quality,
            CategoryKey::Performance,
            CategoryKey::Testing,
            CategoryKey::Security,
            CategoryKey::Devexp,
            CategoryKey::Completeness,
        ]
    }

    /// Stable string key used in config files and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Structure => "structure",
            CategoryKey::Quality => "quality",
            CategoryKey::Performance => "performance",
            CategoryKey::Testing => "testing",
            CategoryKey::Security => "security",
            CategoryKey::Devexp => "devexp",
            CategoryKey::Completeness => "completeness",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryKey::Structure => "Structure",
            CategoryKey::Quality => "Code Quality",
            CategoryKey::Performance => "Performance",
            CategoryKey::Testing => "Testing",
            CategoryKey::Security => "Security",
            CategoryKey::Devexp => "Developer Experience",
            CategoryKey::Completeness => "Completeness",
        }
    }

    /// Default maximum points (weight). Sums to 100 across all categories.
    pub fn default_weight(&self) -> f64 {
        match self {
            CategoryKey::Structure => 20.0,
            CategoryKey::Quality => 20.0,
            CategoryKey::Performance => 15.0,
            CategoryKey::Testing => 15.0,
            CategoryKey::Security => 15.0,
            CategoryKey::Devexp => 10.0,
            CategoryKey::Completeness => 5.0,
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CategoryKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structure" => Ok(CategoryKey::Structure),
            "quality" => Ok(CategoryKey::Quality),
            "performance" => Ok(CategoryKey::Performance),
            "testing" => Ok(CategoryKey::Testing),
            "security" => Ok(CategoryKey::Security),
            "devexp" => Ok(CategoryKey::Devexp),
            "completeness" => Ok(CategoryKey::Completeness),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// One weighted scoring dimension: key, display name, maximum points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub key: CategoryKey,
    pub name: String,
    pub max_score: f64,
}

impl CategoryDefinition {
    pub fn with_defaults(key: CategoryKey) -> Self {
        Self {
            key,
            name: key.display_name().to_string(),
            max_score: key.default_weight(),
        }
    }
}

/// Project metadata captured once at the start of a scoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub root: PathBuf,
    pub kind: crate::config::ProjectKind,
    pub name: String,
    pub version: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// An improvement suggestion attached to a category result.
///
/// `suggestion` doubles as the deduplication key when recommendations from
/// all categories are merged into one ranked list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub suggestion: String,
    pub description: String,
    /// Estimated score improvement in points
    pub impact: f64,
    pub category: CategoryKey,
}

/// Raw output of a single analyzer run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub category: CategoryKey,
    /// Raw score, clamped to `[0, max_score]`
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub metrics: BTreeMap<String, serde_json::Value>,
    /// Present only when the analyzer failed; the category scores 0
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalyzerResult {
    /// Create a successful result with the score clamped into range
    pub fn success(category: CategoryKey, score: f64, max_score: f64) -> Self {
        Self {
            category,
            score: score.clamp(0.0, max_score),
            max_score,
            issues: Vec::new(),
            recommendations: Vec::new(),
            metrics: BTreeMap::new(),
            error: None,
        }
    }

    /// Create a failed result: score 0, explanatory issue, error recorded
    pub fn failure(category: CategoryKey, max_score: f64, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            category,
            score: 0.0,
            max_score,
            issues: vec![format!("Analysis failed: {}", error)],
            recommendations: Vec::new(),
            metrics: BTreeMap::new(),
            error: Some(error),
        }
    }

    /// Result for an analyzer that was cancelled before completing
    pub fn cancelled(category: CategoryKey, max_score: f64) -> Self {
        Self {
            category,
            score: 0.0,
            max_score,
            issues: vec!["cancelled".to_string()],
            recommendations: Vec::new(),
            metrics: BTreeMap::new(),
            error: Some("cancelled".to_string()),
        }
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }

    pub fn with_recommendation(mut self, rec: Recommendation) -> Self {
        self.recommendations.push(rec);
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}

/// Weighted per-category score derived from an `AnalyzerResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub key: CategoryKey,
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    /// Rounded to the nearest whole percent
    pub percentage: f64,
    pub grade: String,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Composite score across all scored categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallScore {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub grade: String,
    /// True if any category recorded an analyzer error
    pub has_errors: bool,
    pub generated_at: DateTime<Utc>,
}

/// The single validated artifact every output format derives from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub metadata: ProjectMetadata,
    /// Category scores in registration order, stable across runs
    pub categories: Vec<CategoryScore>,
    pub overall: OverallScore,
    /// Deduplicated, sorted descending by impact
    pub recommendations: Vec<Recommendation>,
}

/// Compact summary shape for dashboards and caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub grade: String,
    pub categories: usize,
    pub has_errors: bool,
    pub generated_at: DateTime<Utc>,
}

/// Map a percentage (0-100) to a letter grade.
///
/// Monotonic: a higher percentage never yields a lower grade.
pub fn grade_from_percentage(percentage: f64) -> &'static str {
    if percentage >= 98.0 {
        "A+"
    } else if percentage >= 93.0 {
        "A"
    } else if percentage >= 90.0 {
        "A-"
    } else if percentage >= 87.0 {
        "B+"
    } else if percentage >= 83.0 {
        "B"
    } else if percentage >= 80.0 {
        "B-"
    } else if percentage >= 77.0 {
        "C+"
    } else if percentage >= 73.0 {
        "C"
    } else if percentage >= 70.0 {
        "C-"
    } else if percentage >= 67.0 {
        "D+"
    } else if percentage >= 65.0 {
        "D"
    } else if percentage >= 60.0 {
        "D-"
    } else {
        "F"
    }
}
