//! Developer experience analyzer
//!
//! Checks the things that make a repo pleasant to work on: a real README,
//! CI configuration, editor/lint config, and task runner scripts.

use crate::analyzers::base::{Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use serde_json::json;

const CI_PATHS: &[&str] = &[
    ".github/workflows",
    ".gitlab-ci.yml",
    "Jenkinsfile",
    ".circleci/config.yml",
    "azure-pipelines.yml",
];

pub struct DevexpAnalyzer;

impl Analyzer for DevexpAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Devexp
    }

    fn description(&self) -> &'static str {
        "Checks README substance, CI config, editor config, and scripts"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        ctx.ensure_active()?;
        let max = ctx.max_score;
        let mut penalty: f64 = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        let readme_len = readme_length(ctx);
        if readme_len < 300 {
            penalty += 0.20;
            issues.push(if readme_len == 0 {
                "No README".to_string()
            } else {
                "README is too thin to onboard anyone".to_string()
            });
            recs.push(Recommendation {
                suggestion: "Write a substantive README".to_string(),
                description: "Cover what the project does, how to install it, and how to \
                              run it locally."
                    .to_string(),
                impact: max * 0.20,
                category: self.key(),
            });
        }

        let has_ci = CI_PATHS.iter().any(|p| ctx.root.join(p).exists());
        if !has_ci {
            penalty += 0.30;
            issues.push("No CI configuration found".to_string());
            recs.push(Recommendation {
                suggestion: "Add a CI pipeline".to_string(),
                description: "Without CI, every contributor runs (or skips) the checks \
                              by hand."
                    .to_string(),
                impact: max * 0.30,
                category: self.key(),
            });
        }

        let has_editor_config = ctx.root.join(".editorconfig").is_file()
            || ctx.root.join(".prettierrc").is_file()
            || ctx.root.join("rustfmt.toml").is_file()
            || ctx.root.join(".eslintrc.json").is_file()
            || ctx.root.join("eslint.config.js").is_file();
        if !has_editor_config {
            penalty += 0.15;
            issues.push("No formatter or linter configuration".to_string());
            recs.push(Recommendation {
                suggestion: "Add formatter/linter configuration".to_string(),
                description: "Shared format config keeps diffs about behavior, not \
                              whitespace."
                    .to_string(),
                impact: max * 0.15,
                category: self.key(),
            });
        }

        if !has_task_runner(ctx) {
            penalty += 0.20;
            issues.push("No task runner entry points (scripts, Makefile)".to_string());
            recs.push(Recommendation {
                suggestion: "Add common task entry points".to_string(),
                description: "package.json scripts or a Makefile give contributors one \
                              obvious way to build and test."
                    .to_string(),
                impact: max * 0.20,
                category: self.key(),
            });
        }

        let has_contributing = ctx.root.join("CONTRIBUTING.md").is_file();
        if !has_contributing {
            penalty += 0.15;
            issues.push("No CONTRIBUTING guide".to_string());
            recs.push(Recommendation {
                suggestion: "Add a CONTRIBUTING.md".to_string(),
                description: "Document how changes are proposed, reviewed, and released."
                    .to_string(),
                impact: max * 0.15,
                category: self.key(),
            });
        }

        let score = max * (1.0 - penalty).max(0.0);
        let mut result = AnalyzerResult::success(self.key(), score, max);
        result.issues = issues;
        result.recommendations = recs;
        result = result
            .with_metric("readme_bytes", json!(readme_len))
            .with_metric("has_ci", json!(has_ci))
            .with_metric("has_editor_config", json!(has_editor_config));
        Ok(result)
    }
}

fn readme_length(ctx: &AnalyzerContext) -> usize {
    for name in ["README.md", "README.rst", "README.txt", "README"] {
        if let Ok(meta) = std::fs::metadata(ctx.root.join(name)) {
            return meta.len() as usize;
        }
    }
    0
}

fn has_task_runner(ctx: &AnalyzerContext) -> bool {
    if ctx.root.join("Makefile").is_file() || ctx.root.join("justfile").is_file() {
        return true;
    }
    // Cargo and similar manifests come with standard build/test commands
    if ctx.root.join("Cargo.toml").is_file() || ctx.root.join("go.mod").is_file() {
        return true;
    }
    if let Ok(content) = std::fs::read_to_string(ctx.root.join("package.json")) {
        if let Ok(pkg) = serde_json::from_str::<serde_json::Value>(&content) {
            return pkg
                .get("scripts")
                .and_then(|s| s.as_object())
                .is_some_and(|s| !s.is_empty());
        }
    }
    false
}
