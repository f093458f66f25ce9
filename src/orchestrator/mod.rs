//! Analyzer execution engine with parallel support
//!
//! The orchestrator runs the configured analyzer set:
//! - Validates the requested categories against the registry up front
//! - Runs analyzers in parallel on a bounded rayon pool
//! - Converts per-analyzer failures into degraded category results
//! - Collects results in registration order regardless of completion order
//!
//! Failure isolation: one misbehaving analyzer zeroes its own category and
//! nothing else. Only configuration errors abort the run, and they do so
//! before any analyzer starts.

use crate::analyzers::{self, Analyzer, AnalyzerContext, ProgressCallback, CANCELLED};
use crate::config::{ConfigError, RunConfig};
use crate::models::{AnalyzerResult, CategoryDefinition};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Hard cap on worker threads, matching what file-system scans can use
const MAX_WORKERS: usize = 16;

/// Runs analyzers and collects their raw results
pub struct AnalyzerOrchestrator {
    analyzers: Vec<Box<dyn Analyzer>>,
    progress_callback: Option<ProgressCallback>,
}

impl AnalyzerOrchestrator {
    /// Orchestrator over the built-in analyzer registry
    pub fn new() -> Self {
        Self {
            analyzers: analyzers::default_registry(),
            progress_callback: None,
        }
    }

    /// Set a progress callback, invoked once per completed analyzer
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run all active analyzers for this configuration.
    ///
    /// Returns one `AnalyzerResult` per active category, in registration
    /// order. The only error is configuration-time: a requested category
    /// with no registered analyzer.
    pub fn run(&self, config: &RunConfig) -> Result<Vec<AnalyzerResult>, ConfigError> {
        // Fail fast before any analysis starts
        let active: Vec<(&CategoryDefinition, &dyn Analyzer)> = config
            .categories
            .iter()
            .map(|def| {
                self.analyzers
                    .iter()
                    .find(|a| a.key() == def.key)
                    .map(|a| (def, a.as_ref()))
                    .ok_or_else(|| ConfigError::UnknownCategory(def.key.to_string()))
            })
            .collect::<Result<_, _>>()?;

        let workers = config.workers.clamp(1, MAX_WORKERS).min(active.len().max(1));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| ConfigError::Malformed(format!("worker pool: {}", e)))?;

        let cancel = Arc::new(AtomicBool::new(false));
        let deadline = config.timeout.map(|t| Instant::now() + t);
        let total = active.len();
        let completed = AtomicUsize::new(0);
        let started = Instant::now();

        info!(
            "Running {} analyzers with {} workers{}",
            total,
            workers,
            config
                .timeout
                .map(|t| format!(" (timeout {:?})", t))
                .unwrap_or_default()
        );

        let results: Vec<AnalyzerResult> = pool.install(|| {
            active
                .par_iter()
                .map(|&(def, analyzer)| {
                    let ctx = AnalyzerContext::new(
                        config.root.clone(),
                        config.kind,
                        def.max_score,
                        Arc::clone(&cancel),
                        deadline,
                    );
                    let result = self.run_one(analyzer, def, &ctx);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref cb) = self.progress_callback {
                        cb(def.key, done, total);
                    }
                    result
                })
                .collect()
        });

        info!(
            "Analysis finished in {:.2}s ({} categories)",
            started.elapsed().as_secs_f64(),
            results.len()
        );
        Ok(results)
    }

    /// Run a single analyzer with failure isolation
    fn run_one(
        &self,
        analyzer: &dyn Analyzer,
        def: &CategoryDefinition,
        ctx: &AnalyzerContext,
    ) -> AnalyzerResult {
        if ctx.is_cancelled() {
            warn!("Analyzer '{}' cancelled before start", def.key);
            return AnalyzerResult::cancelled(def.key, def.max_score);
        }

        let started = Instant::now();
        match analyzer.analyze(ctx) {
            Ok(mut result) => {
                // Defensive: the contract says clamped, enforce it anyway
                result.category = def.key;
                result.max_score = def.max_score;
                result.score = result.score.clamp(0.0, def.max_score);
                debug!(
                    "Analyzer '{}' scored {:.1}/{:.1} in {:.2}s",
                    def.key,
                    result.score,
                    result.max_score,
                    started.elapsed().as_secs_f64()
                );
                result
            }
            Err(e) if e.to_string() == CANCELLED => {
                warn!("Analyzer '{}' cancelled mid-run", def.key);
                AnalyzerResult::cancelled(def.key, def.max_score)
            }
            Err(e) => {
                warn!("Analyzer '{}' failed: {}", def.key, e);
                AnalyzerResult::failure(def.key, def.max_score, e.to_string())
            }
        }
    }
}

impl Default for AnalyzerOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScorecardConfig;
    use crate::models::CategoryKey;
    use std::path::Path;
    use std::time::Duration;

    fn run_config(root: &Path, subset: Option<&[CategoryKey]>) -> RunConfig {
        RunConfig::build(root, &ScorecardConfig::default(), subset, 4, None).unwrap()
    }

    /// Analyzer that always fails, for isolation tests
    struct ExplodingAnalyzer;
    impl Analyzer for ExplodingAnalyzer {
        fn key(&self) -> CategoryKey {
            CategoryKey::Security
        }
        fn description(&self) -> &'static str {
            "always fails"
        }
        fn analyze(&self, _ctx: &AnalyzerContext) -> anyhow::Result<AnalyzerResult> {
            anyhow::bail!("timeout")
        }
    }

    fn orchestrator_with_exploding_security() -> AnalyzerOrchestrator {
        let mut orch = AnalyzerOrchestrator::new();
        let idx = orch
            .analyzers
            .iter()
            .position(|a| a.key() == CategoryKey::Security)
            .unwrap();
        orch.analyzers[idx] = Box::new(ExplodingAnalyzer);
        orch
    }

    #[test]
    fn test_results_in_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "print('x')\n").unwrap();

        let config = run_config(dir.path(), None);
        let results = AnalyzerOrchestrator::new().run(&config).unwrap();

        let keys: Vec<CategoryKey> = results.iter().map(|r| r.category).collect();
        assert_eq!(keys, CategoryKey::all().to_vec());
    }

    #[test]
    fn test_one_failure_degrades_only_its_category() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "print('x')\n").unwrap();

        let config = run_config(dir.path(), None);
        let results = orchestrator_with_exploding_security().run(&config).unwrap();

        assert_eq!(results.len(), 7);
        let security = results
            .iter()
            .find(|r| r.category == CategoryKey::Security)
            .unwrap();
        assert_eq!(security.score, 0.0);
        assert_eq!(security.max_score, 15.0);
        assert_eq!(security.issues, vec!["Analysis failed: timeout".to_string()]);
        assert_eq!(security.error.as_deref(), Some("timeout"));
        // Everyone else unaffected
        assert!(results
            .iter()
            .filter(|r| r.category != CategoryKey::Security)
            .all(|r| r.error.is_none()));
    }

    #[test]
    fn test_subset_runs_only_requested() {
        let dir = tempfile::tempdir().unwrap();
        let subset = [CategoryKey::Quality, CategoryKey::Testing];
        let config = run_config(dir.path(), Some(&subset));
        let results = AnalyzerOrchestrator::new().run(&config).unwrap();

        let keys: Vec<CategoryKey> = results.iter().map(|r| r.category).collect();
        assert_eq!(keys, vec![CategoryKey::Quality, CategoryKey::Testing]);
    }

    #[test]
    fn test_expired_deadline_records_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::build(
            dir.path(),
            &ScorecardConfig::default(),
            None,
            4,
            Some(Duration::ZERO),
        )
        .unwrap();

        let results = AnalyzerOrchestrator::new().run(&config).unwrap();
        // Deadline already passed: every category is recorded, none omitted
        assert_eq!(results.len(), 7);
        for r in &results {
            assert_eq!(r.score, 0.0);
            assert_eq!(r.issues, vec!["cancelled".to_string()]);
        }
        // Total weight invariant survives cancellation
        let total_max: f64 = results.iter().map(|r| r.max_score).sum();
        assert!((total_max - 100.0).abs() < 0.01);
    }
}
