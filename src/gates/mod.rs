//! Quality gate evaluation
//!
//! Gates apply a threshold policy to an already-validated score report and
//! decide whether a CI pipeline may proceed. Evaluation is independent of
//! how the score was computed; a gate only ever reads scores.
//!
//! A gate passes when `score >= min` and additionally warns when the score
//! sits in `[min, warn)`. The aggregate blocking decision is the logical
//! AND over gates with `block_on_failure` set; non-blocking gates can fail
//! loudly without stopping a deploy.

pub mod ci;

use crate::config::{ConfigError, GateOverride, ScorecardConfig};
use crate::models::{CategoryDefinition, CategoryKey, ScoreReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// What a gate measures: the composite score or one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateScope {
    Overall,
    Category(CategoryKey),
}

/// A configured pass/warn/fail threshold
#[derive(Debug, Clone)]
pub struct GateDefinition {
    /// "overall" or the category key
    pub name: String,
    pub scope: GateScope,
    /// Minimum passing score
    pub min: f64,
    /// Warning threshold, >= min
    pub warn: f64,
    /// Whether a failure flips the aggregate blocking decision
    pub block_on_failure: bool,
}

/// Evaluation outcome for one gate
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub name: String,
    pub score: f64,
    pub threshold: f64,
    pub warn_threshold: f64,
    pub blocking: bool,
    pub passed: bool,
    pub warning: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Counts across all evaluated gates
#[derive(Debug, Clone, Serialize)]
pub struct GatesSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    /// Percentage of gates that passed, 0-100
    pub pass_rate: f64,
}

/// Full gate evaluation output
#[derive(Debug, Clone, Serialize)]
pub struct GatesReport {
    pub gates: Vec<GateResult>,
    pub summary: GatesSummary,
    /// AND over all blocking gates; non-blocking failures don't flip this
    pub passed: bool,
    pub generated_at: DateTime<Utc>,
}

/// The gate evaluation engine. Construction validates configuration;
/// evaluation cannot fail.
#[derive(Debug)]
pub struct QualityGates {
    gates: Vec<GateDefinition>,
}

impl QualityGates {
    /// Validate and build a gate set.
    ///
    /// Misconfiguration (warn below min, a gate on an inactive category,
    /// no gates at all) is rejected here, at setup time, so evaluation
    /// never has to report configuration problems.
    pub fn new(
        gates: Vec<GateDefinition>,
        active: &[CategoryDefinition],
    ) -> Result<Self, ConfigError> {
        if gates.is_empty() {
            return Err(ConfigError::Gate("no gates configured".to_string()));
        }
        for gate in &gates {
            if gate.warn < gate.min {
                return Err(ConfigError::Gate(format!(
                    "gate '{}': warning threshold {:.1} is below minimum {:.1}",
                    gate.name, gate.warn, gate.min
                )));
            }
            if gate.min < 0.0 {
                return Err(ConfigError::Gate(format!(
                    "gate '{}': minimum threshold must not be negative",
                    gate.name
                )));
            }
            if let GateScope::Category(key) = gate.scope {
                if !active.iter().any(|c| c.key == key) {
                    return Err(ConfigError::Gate(format!(
                        "gate '{}' references a category that is not being scored",
                        gate.name
                    )));
                }
            }
        }
        Ok(Self { gates })
    }

    /// Default gate set for the active categories: overall 70/80 blocking,
    /// per-category thresholds scaled to the category weight (75% / 90%),
    /// warn-only.
    pub fn default_definitions(active: &[CategoryDefinition]) -> Vec<GateDefinition> {
        let mut gates = vec![GateDefinition {
            name: "overall".to_string(),
            scope: GateScope::Overall,
            min: 70.0,
            warn: 80.0,
            block_on_failure: true,
        }];
        for def in active {
            gates.push(GateDefinition {
                name: def.key.to_string(),
                scope: GateScope::Category(def.key),
                min: def.max_score * 0.75,
                warn: def.max_score * 0.90,
                block_on_failure: false,
            });
        }
        gates
    }

    /// Evaluate every gate against the report.
    pub fn evaluate(&self, report: &ScoreReport) -> GatesReport {
        let results: Vec<GateResult> = self.gates.iter().map(|g| evaluate_gate(g, report)).collect();

        let passed_count = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed_count;
        let warnings = results.iter().filter(|r| r.warning).count();
        let pass_rate = if results.is_empty() {
            100.0
        } else {
            (passed_count as f64 / results.len() as f64 * 100.0).round()
        };

        let passed = results.iter().filter(|r| r.blocking).all(|r| r.passed);

        debug!(
            "Gate evaluation: {}/{} passed, {} warnings, blocking verdict {}",
            passed_count,
            results.len(),
            warnings,
            passed
        );

        GatesReport {
            summary: GatesSummary {
                total: results.len(),
                passed: passed_count,
                failed,
                warnings,
                pass_rate,
            },
            gates: results,
            passed,
            generated_at: Utc::now(),
        }
    }
}

fn evaluate_gate(gate: &GateDefinition, report: &ScoreReport) -> GateResult {
    let (score, issues) = match gate.scope {
        GateScope::Overall => (report.overall.score, Vec::new()),
        GateScope::Category(key) => report
            .categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| (c.score, c.issues.clone()))
            .unwrap_or((0.0, vec!["category was not scored".to_string()])),
    };

    let passed = score >= gate.min;
    let warning = passed && score < gate.warn;
    let message = if !passed {
        format!(
            "{} score {:.1} is below the minimum {:.1}",
            gate.name, score, gate.min
        )
    } else if warning {
        format!(
            "{} score {:.1} passed but is below the warning threshold {:.1}",
            gate.name, score, gate.warn
        )
    } else {
        format!("{} score {:.1} meets the minimum {:.1}", gate.name, score, gate.min)
    };

    GateResult {
        name: gate.name.clone(),
        score,
        threshold: gate.min,
        warn_threshold: gate.warn,
        blocking: gate.block_on_failure,
        passed,
        warning,
        message,
        issues,
    }
}

/// Build the effective gate set: defaults, then file config overrides,
/// then a `--thresholds` JSON override from the command line.
pub fn build_gates(
    file_config: &ScorecardConfig,
    thresholds_json: Option<&str>,
    active: &[CategoryDefinition],
) -> Result<QualityGates, ConfigError> {
    let mut gates = QualityGates::default_definitions(active);

    apply_override(&mut gates, "overall", file_config.overall_gate_override());
    for def in active {
        apply_override(&mut gates, def.key.as_str(), file_config.category_gate_override(def.key));
    }

    if let Some(json) = thresholds_json {
        let overrides: std::collections::HashMap<String, GateOverride> =
            serde_json::from_str(json)
                .map_err(|e| ConfigError::Malformed(format!("--thresholds: {}", e)))?;
        for (name, ov) in &overrides {
            if !name.eq_ignore_ascii_case("overall") {
                name.parse::<CategoryKey>()
                    .map_err(|_| ConfigError::UnknownCategory(name.clone()))?;
            }
            apply_override(&mut gates, &name.to_lowercase(), Some(ov));
        }
    }

    QualityGates::new(gates, active)
}

fn apply_override(gates: &mut [GateDefinition], name: &str, ov: Option<&GateOverride>) {
    let Some(ov) = ov else { return };
    if let Some(gate) = gates.iter_mut().find(|g| g.name == name) {
        if let Some(min) = ov.min {
            gate.min = min;
            // Keep the invariant when only min is raised past the old warn
            gate.warn = gate.warn.max(min);
        }
        if let Some(warn) = ov.warn {
            gate.warn = warn;
        }
        if let Some(block) = ov.block {
            gate.block_on_failure = block;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::detect_metadata;
    use crate::models::AnalyzerResult;
    use crate::results::ResultsProcessor;
    use crate::scoring::ScoreCalculator;

    fn active_defs() -> Vec<CategoryDefinition> {
        CategoryKey::all()
            .into_iter()
            .map(CategoryDefinition::with_defaults)
            .collect()
    }

    fn report_with_overall(target: f64) -> ScoreReport {
        // Spread `target` points proportionally over the seven categories
        let results: Vec<AnalyzerResult> = CategoryKey::all()
            .into_iter()
            .map(|k| {
                AnalyzerResult::success(k, k.default_weight() * target / 100.0, k.default_weight())
            })
            .collect();
        let dir = tempfile::tempdir().unwrap();
        ResultsProcessor::build_report(
            detect_metadata(dir.path()),
            ScoreCalculator::calculate(&results),
        )
    }

    #[test]
    fn test_blocking_gate_failure_blocks() {
        let report = report_with_overall(65.0);
        let gates = QualityGates::new(
            vec![GateDefinition {
                name: "overall".to_string(),
                scope: GateScope::Overall,
                min: 70.0,
                warn: 80.0,
                block_on_failure: true,
            }],
            &active_defs(),
        )
        .unwrap();

        let result = gates.evaluate(&report);
        assert!(!result.passed);
        assert_eq!(result.summary.failed, 1);
        assert!(result.gates[0].message.contains("below the minimum"));
    }

    #[test]
    fn test_non_blocking_failure_does_not_block() {
        let report = report_with_overall(65.0);
        let gates = QualityGates::new(
            vec![GateDefinition {
                name: "overall".to_string(),
                scope: GateScope::Overall,
                min: 70.0,
                warn: 80.0,
                block_on_failure: false,
            }],
            &active_defs(),
        )
        .unwrap();

        let result = gates.evaluate(&report);
        assert!(!result.gates[0].passed);
        assert!(result.passed, "non-blocking gate must not block");
    }

    #[test]
    fn test_pass_with_warning() {
        let report = report_with_overall(75.0);
        let gates = QualityGates::new(
            vec![GateDefinition {
                name: "overall".to_string(),
                scope: GateScope::Overall,
                min: 70.0,
                warn: 80.0,
                block_on_failure: true,
            }],
            &active_defs(),
        )
        .unwrap();

        let result = gates.evaluate(&report);
        assert!(result.passed);
        assert!(result.gates[0].warning);
        assert_eq!(result.summary.warnings, 1);
    }

    #[test]
    fn test_category_gate_reads_category_score() {
        let report = report_with_overall(90.0);
        let gates = QualityGates::new(
            vec![GateDefinition {
                name: "security".to_string(),
                scope: GateScope::Category(CategoryKey::Security),
                min: 14.0,
                warn: 14.5,
                block_on_failure: true,
            }],
            &active_defs(),
        )
        .unwrap();

        // security scored 13.5 of 15 -> below min 14
        let result = gates.evaluate(&report);
        assert!(!result.passed);
        assert_eq!(result.gates[0].score, 13.5);
    }

    #[test]
    fn test_warn_below_min_rejected_at_setup() {
        let err = QualityGates::new(
            vec![GateDefinition {
                name: "overall".to_string(),
                scope: GateScope::Overall,
                min: 70.0,
                warn: 60.0,
                block_on_failure: true,
            }],
            &active_defs(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Gate(_)));
    }

    #[test]
    fn test_empty_gate_set_rejected() {
        let err = QualityGates::new(vec![], &active_defs()).unwrap_err();
        assert!(matches!(err, ConfigError::Gate(_)));
    }

    #[test]
    fn test_gate_on_inactive_category_rejected() {
        let active: Vec<CategoryDefinition> = vec![CategoryDefinition::with_defaults(
            CategoryKey::Quality,
        )];
        let err = QualityGates::new(
            vec![GateDefinition {
                name: "security".to_string(),
                scope: GateScope::Category(CategoryKey::Security),
                min: 10.0,
                warn: 12.0,
                block_on_failure: false,
            }],
            &active,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Gate(_)));
    }

    #[test]
    fn test_default_definitions_scaled_to_weight() {
        let gates = QualityGates::default_definitions(&active_defs());
        assert_eq!(gates.len(), 8);
        assert_eq!(gates[0].name, "overall");
        assert!(gates[0].block_on_failure);

        let quality = gates.iter().find(|g| g.name == "quality").unwrap();
        assert!((quality.min - 15.0).abs() < 0.01);
        assert!((quality.warn - 18.0).abs() < 0.01);
        assert!(!quality.block_on_failure);
    }

    #[test]
    fn test_threshold_json_overrides() {
        let cfg = ScorecardConfig::default();
        let gates = build_gates(
            &cfg,
            Some(r#"{"overall": {"min": 50, "warn": 60}, "security": {"min": 5, "block": true}}"#),
            &active_defs(),
        )
        .unwrap();

        let report = report_with_overall(55.0);
        let result = gates.evaluate(&report);
        let overall = result.gates.iter().find(|g| g.name == "overall").unwrap();
        assert!(overall.passed);
        assert!(overall.warning);
        let security = result.gates.iter().find(|g| g.name == "security").unwrap();
        assert!(security.blocking);
    }

    #[test]
    fn test_threshold_json_unknown_category_rejected() {
        let cfg = ScorecardConfig::default();
        let err = build_gates(&cfg, Some(r#"{"styling": {"min": 5}}"#), &active_defs());
        assert!(matches!(err, Err(ConfigError::UnknownCategory(_))));
    }

    #[test]
    fn test_threshold_json_malformed_rejected() {
        let cfg = ScorecardConfig::default();
        let err = build_gates(&cfg, Some("{not json"), &active_defs());
        assert!(matches!(err, Err(ConfigError::Malformed(_))));
    }
}
