//! Configuration module for Scorecard
//!
//! This module handles:
//! - Project-level configuration (scorecard.toml)
//! - Category weight and gate threshold overrides
//! - Project kind detection
//! - The immutable per-run configuration passed to every component

mod project_config;
mod project_kind;

pub use project_config::{
    load_config, CategoryOverride, CliDefaults, GateOverride, ScorecardConfig,
};
pub use project_kind::{detect_metadata, ProjectKind};

use crate::models::{CategoryDefinition, CategoryKey};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration-time errors. These abort the run before any analysis.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown category '{0}' (valid: structure, quality, performance, testing, security, devexp, completeness)")]
    UnknownCategory(String),

    #[error("invalid category weights: {0}")]
    InvalidWeights(String),

    #[error("invalid gate configuration: {0}")]
    Gate(String),

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Immutable configuration for a single scoring run.
///
/// Built once from CLI flags plus the project config file, then passed by
/// reference into every component. Nothing downstream mutates it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Active categories in registration order
    pub categories: Vec<CategoryDefinition>,
    /// Worker threads for the analyzer fan-out
    pub workers: usize,
    /// Overall deadline; analyzers past it are recorded as cancelled
    pub timeout: Option<Duration>,
}

impl RunConfig {
    /// Build the run configuration for `root`.
    ///
    /// `requested` narrows the active set to a subset of registered
    /// categories; `None` means all categories enabled by the file config.
    /// Category weights come from the file config with built-in defaults.
    pub fn build(
        root: &Path,
        file_config: &ScorecardConfig,
        requested: Option<&[CategoryKey]>,
        workers: usize,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        file_config.validate()?;

        let mut categories = Vec::new();
        for key in CategoryKey::all() {
            let mut def = CategoryDefinition::with_defaults(key);
            if let Some(ov) = file_config.category_override(key) {
                if ov.enabled == Some(false) {
                    continue;
                }
                if let Some(weight) = ov.weight {
                    def.max_score = weight;
                }
            }
            if let Some(subset) = requested {
                if !subset.contains(&key) {
                    continue;
                }
            }
            categories.push(def);
        }

        if categories.is_empty() {
            return Err(ConfigError::InvalidWeights(
                "no categories are active".to_string(),
            ));
        }
        for def in &categories {
            if def.max_score <= 0.0 {
                return Err(ConfigError::InvalidWeights(format!(
                    "category '{}' has non-positive weight {}",
                    def.key, def.max_score
                )));
            }
        }

        // With the full category set active the maxima must sum to 100.
        // Subsets keep the sum of their own weights (no renormalization).
        if categories.len() == CategoryKey::all().len() {
            let total: f64 = categories.iter().map(|c| c.max_score).sum();
            if (total - 100.0).abs() > 0.01 {
                return Err(ConfigError::InvalidWeights(format!(
                    "weights for the full category set must sum to 100, got {}",
                    total
                )));
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            kind: ProjectKind::detect(root),
            categories,
            workers,
            timeout,
        })
    }

    /// Max score (weight) of one active category, if active
    pub fn max_score_for(&self, key: CategoryKey) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.max_score)
    }

    /// Sum of active category maxima
    pub fn total_max_score(&self) -> f64 {
        self.categories.iter().map(|c| c.max_score).sum()
    }
}

/// Parse a `--categories` style value: "all" or a comma-separated list.
pub fn parse_category_list(value: &str) -> Result<Option<Vec<CategoryKey>>, ConfigError> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    let mut keys = Vec::new();
    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let key: CategoryKey = part
            .parse()
            .map_err(|_| ConfigError::UnknownCategory(part.to_string()))?;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return Err(ConfigError::Malformed(
            "--categories must name at least one category".to_string(),
        ));
    }
    Ok(Some(keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_set_sums_to_100() {
        let cfg = ScorecardConfig::default();
        let run = RunConfig::build(Path::new("."), &cfg, None, 4, None).unwrap();
        assert_eq!(run.categories.len(), 7);
        assert!((run.total_max_score() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_subset_keeps_own_weights() {
        let cfg = ScorecardConfig::default();
        let subset = [CategoryKey::Quality, CategoryKey::Testing];
        let run = RunConfig::build(Path::new("."), &cfg, Some(&subset), 4, None).unwrap();
        assert_eq!(run.categories.len(), 2);
        assert!((run.total_max_score() - 35.0).abs() < 0.01);
        // Registration order, not request order
        assert_eq!(run.categories[0].key, CategoryKey::Quality);
        assert_eq!(run.categories[1].key, CategoryKey::Testing);
    }

    #[test]
    fn test_parse_category_list() {
        assert!(parse_category_list("all").unwrap().is_none());
        let keys = parse_category_list("quality, testing").unwrap().unwrap();
        assert_eq!(keys, vec![CategoryKey::Quality, CategoryKey::Testing]);
        assert!(matches!(
            parse_category_list("quality,bogus"),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_bad_weight_override_rejected() {
        let toml = r#"
            [categories.quality]
            weight = -5
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        let err = RunConfig::build(Path::new("."), &cfg, None, 4, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeights(_)));
    }

    #[test]
    fn test_full_set_weight_override_must_rebalance() {
        // Raising one weight without lowering another breaks the 100-point total
        let toml = r#"
            [categories.quality]
            weight = 30
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        let err = RunConfig::build(Path::new("."), &cfg, None, 4, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeights(_)));
    }

    #[test]
    fn test_disabled_category_leaves_subset_sum() {
        let toml = r#"
            [categories.completeness]
            enabled = false
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        let run = RunConfig::build(Path::new("."), &cfg, None, 4, None).unwrap();
        assert_eq!(run.categories.len(), 6);
        assert!((run.total_max_score() - 95.0).abs() < 0.01);
    }
}
