//! Project-level configuration support
//!
//! Loads per-project configuration from `scorecard.toml` or
//! `.scorecardrc.json` in the project root.
//!
//! # Configuration Format
//!
//! ```toml
//! # scorecard.toml
//!
//! [categories.quality]
//! weight = 25
//!
//! [categories.completeness]
//! enabled = false
//!
//! [gates.overall]
//! min = 70
//! warn = 80
//!
//! [gates.security]
//! min = 12
//! warn = 14
//! block = true
//!
//! [defaults]
//! format = "console"
//! workers = 8
//! blocking = true
//! timeout_secs = 120
//! ```

use super::ConfigError;
use crate::models::CategoryKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Project-level configuration loaded from scorecard.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScorecardConfig {
    /// Per-category weight and enable overrides, keyed by category name
    #[serde(default)]
    pub categories: HashMap<String, CategoryOverride>,

    /// Gate threshold overrides, keyed by "overall" or a category name
    #[serde(default)]
    pub gates: HashMap<String, GateOverride>,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Override for a single category
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CategoryOverride {
    /// Whether the category is scored (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Maximum points for the category
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Threshold override for one gate
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GateOverride {
    /// Minimum passing score
    #[serde(default)]
    pub min: Option<f64>,

    /// Warning threshold (must be >= min)
    #[serde(default)]
    pub warn: Option<f64>,

    /// Whether a failure blocks the pipeline
    #[serde(default)]
    pub block: Option<bool>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (console, json, html)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Default blocking behavior for the gates command
    #[serde(default)]
    pub blocking: Option<bool>,

    /// Overall analysis deadline in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ScorecardConfig {
    /// Check that every category and gate key names something real.
    ///
    /// Keys are free-form strings in the file; they are resolved against the
    /// closed category set here, once, so downstream code never sees an
    /// unknown key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in self.categories.keys() {
            key.parse::<CategoryKey>()
                .map_err(|_| ConfigError::UnknownCategory(key.clone()))?;
        }
        for key in self.gates.keys() {
            if key.eq_ignore_ascii_case("overall") {
                continue;
            }
            key.parse::<CategoryKey>()
                .map_err(|_| ConfigError::UnknownCategory(key.clone()))?;
        }
        Ok(())
    }

    /// Override for one category, if configured
    pub fn category_override(&self, key: CategoryKey) -> Option<&CategoryOverride> {
        self.categories.get(key.as_str())
    }

    /// Gate override for the overall score, if configured
    pub fn overall_gate_override(&self) -> Option<&GateOverride> {
        self.gates
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("overall"))
            .map(|(_, v)| v)
    }

    /// Gate override for one category, if configured
    pub fn category_gate_override(&self, key: CategoryKey) -> Option<&GateOverride> {
        self.gates.get(key.as_str())
    }
}

/// Load project configuration from the project root.
///
/// Searches for configuration files in this order:
/// 1. `scorecard.toml`
/// 2. `.scorecardrc.json`
///
/// Returns default configuration if no config file is found. A file that
/// exists but fails to parse is a fatal configuration error, not a warning:
/// silently scoring with default weights when the user wrote overrides
/// would change gate outcomes.
pub fn load_config(root: &Path) -> Result<ScorecardConfig, ConfigError> {
    let toml_path = root.join("scorecard.toml");
    if toml_path.exists() {
        let content = std::fs::read_to_string(&toml_path)
            .map_err(|e| ConfigError::Malformed(format!("{}: {}", toml_path.display(), e)))?;
        let config: ScorecardConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Malformed(format!("{}: {}", toml_path.display(), e)))?;
        config.validate()?;
        debug!("Loaded project config from {}", toml_path.display());
        return Ok(config);
    }

    let json_path = root.join(".scorecardrc.json");
    if json_path.exists() {
        let content = std::fs::read_to_string(&json_path)
            .map_err(|e| ConfigError::Malformed(format!("{}: {}", json_path.display(), e)))?;
        let config: ScorecardConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Malformed(format!("{}: {}", json_path.display(), e)))?;
        config.validate()?;
        debug!("Loaded project config from {}", json_path.display());
        return Ok(config);
    }

    debug!("No project config found, using defaults");
    Ok(ScorecardConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [categories.quality]
            weight = 25

            [gates.overall]
            min = 70
            warn = 80

            [gates.security]
            min = 12
            block = true

            [defaults]
            format = "json"
            workers = 4
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        cfg.validate().unwrap();

        assert_eq!(
            cfg.category_override(CategoryKey::Quality).unwrap().weight,
            Some(25.0)
        );
        assert_eq!(cfg.overall_gate_override().unwrap().min, Some(70.0));
        let sec = cfg.category_gate_override(CategoryKey::Security).unwrap();
        assert_eq!(sec.min, Some(12.0));
        assert_eq!(sec.block, Some(true));
        assert_eq!(cfg.defaults.format.as_deref(), Some("json"));
        assert_eq!(cfg.defaults.workers, Some(4));
    }

    #[test]
    fn test_unknown_category_key_rejected() {
        let toml = r#"
            [categories.documentation]
            weight = 10
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_unknown_gate_key_rejected() {
        let toml = r#"
            [gates.stability]
            min = 10
        "#;
        let cfg: ScorecardConfig = toml::from_str(toml).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scorecard.toml"), "not [valid toml").unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert!(cfg.categories.is_empty());
        assert!(cfg.gates.is_empty());
    }

    #[test]
    fn test_json_config_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".scorecardrc.json"),
            r#"{"gates": {"overall": {"min": 60}}}"#,
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.overall_gate_override().unwrap().min, Some(60.0));
    }
}
