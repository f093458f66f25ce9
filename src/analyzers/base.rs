//! Analyzer trait and shared context
//!
//! This module defines the core abstractions for category analysis:
//! - `Analyzer` trait that all category analyzers implement
//! - `AnalyzerContext` carrying per-run inputs and the cancellation flag
//! - File-walking helpers shared by the concrete analyzers

use crate::config::ProjectKind;
use crate::models::{AnalyzerResult, CategoryKey};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Error message used when an analyzer is stopped by cancellation.
/// The orchestrator matches on this to record the category as cancelled
/// rather than failed.
pub const CANCELLED: &str = "cancelled";

/// Extensions treated as source code when walking the project tree
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "mjs", "cjs", "rs", "go", "java", "rb", "php", "cs", "cpp",
    "c", "h", "swift", "kt",
];

/// Per-run inputs handed to each analyzer.
///
/// Read-only: analyzers share the project tree but no mutable state.
#[derive(Debug, Clone)]
pub struct AnalyzerContext {
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Maximum points this analyzer's category can award
    pub max_score: f64,
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl AnalyzerContext {
    pub fn new(
        root: PathBuf,
        kind: ProjectKind,
        max_score: f64,
        cancel: Arc<AtomicBool>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            root,
            kind,
            max_score,
            cancel,
            deadline,
        }
    }

    /// True once the run is cancelled or past its deadline
    pub fn is_cancelled(&self) -> bool {
        if self.cancel.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                // Latch so sibling analyzers observe cancellation immediately
                self.cancel.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    /// Bail out of an analyzer when the run is cancelled.
    /// Call this inside file loops so cancellation is cooperative.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            anyhow::bail!(CANCELLED);
        }
        Ok(())
    }
}

/// Trait for all category analyzers.
///
/// Analyzers inspect the project tree and produce one category's raw
/// result. Expected conditions (missing manifest, unreadable file) are not
/// errors; an `Err` is reserved for unexpected failures and is absorbed by
/// the orchestrator, degrading only this analyzer's category.
pub trait Analyzer: Send + Sync {
    /// Category this analyzer scores
    fn key(&self) -> CategoryKey;

    /// Human-readable description of what this analyzer inspects
    fn description(&self) -> &'static str;

    /// Run analysis and return the category result.
    ///
    /// The returned score must lie in `[0, ctx.max_score]`.
    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult>;
}

/// Progress callback: (category, completed, total)
pub type ProgressCallback = Box<dyn Fn(CategoryKey, usize, usize) + Send + Sync>;

/// Walk the project tree and collect source files, respecting .gitignore.
pub fn source_files(ctx: &AnalyzerContext) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in ignore::WalkBuilder::new(&ctx.root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        ctx.ensure_active()?;
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file()) && has_source_extension(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Whether a path has a recognized source-code extension
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a file path looks like a test file
pub fn is_test_path(path: &Path) -> bool {
    let lower = path.to_string_lossy().to_lowercase();
    lower.contains("/test/")
        || lower.contains("/tests/")
        || lower.contains("/__tests__/")
        || lower.contains("/spec/")
        || lower.starts_with("test/")
        || lower.starts_with("tests/")
        || lower.ends_with("_test.go")
        || lower.ends_with("_test.py")
        || lower.ends_with("_test.rs")
        || lower.ends_with(".test.ts")
        || lower.ends_with(".test.js")
        || lower.ends_with(".test.tsx")
        || lower.ends_with(".test.jsx")
        || lower.ends_with(".spec.ts")
        || lower.ends_with(".spec.js")
        || lower.starts_with("test_")
        || lower.contains("/test_")
}

/// Line count of a file, 0 when unreadable
pub fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|c| c.lines().count())
        .unwrap_or(0)
}
