//! Completeness analyzer
//!
//! Checks whether the project ships the metadata a published artifact
//! needs: manifest fields, a license, a changelog, and documentation.

use crate::analyzers::base::{Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use serde_json::json;

pub struct CompletenessAnalyzer;

impl Analyzer for CompletenessAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Completeness
    }

    fn description(&self) -> &'static str {
        "Checks manifest metadata, license, changelog, and docs"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        ctx.ensure_active()?;
        let max = ctx.max_score;
        let mut penalty = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        let missing = missing_manifest_fields(ctx);
        if !missing.is_empty() {
            let p = (missing.len() as f64 * 0.15).min(0.45);
            penalty += p;
            issues.push(format!("Manifest is missing: {}", missing.join(", ")));
            recs.push(Recommendation {
                suggestion: "Fill in manifest metadata".to_string(),
                description: "Description, license, and repository fields are what \
                              registries and dependents see first."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        let has_license = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"]
            .iter()
            .any(|f| ctx.root.join(f).is_file());
        if !has_license {
            penalty += 0.20;
            issues.push("No LICENSE file".to_string());
            recs.push(Recommendation {
                suggestion: "Add a LICENSE file".to_string(),
                description: "Without a license, nobody can legally reuse the code."
                    .to_string(),
                impact: max * 0.20,
                category: self.key(),
            });
        }

        let has_changelog = ["CHANGELOG.md", "CHANGELOG", "HISTORY.md"]
            .iter()
            .any(|f| ctx.root.join(f).is_file());
        if !has_changelog {
            penalty += 0.15;
            issues.push("No changelog".to_string());
            recs.push(Recommendation {
                suggestion: "Keep a CHANGELOG".to_string(),
                description: "A changelog tells users what a version bump actually \
                              changed."
                    .to_string(),
                impact: max * 0.15,
                category: self.key(),
            });
        }

        let has_docs = ctx.root.join("docs").is_dir() || ctx.root.join("doc").is_dir();
        if !has_docs {
            penalty += 0.20;
            issues.push("No docs/ directory".to_string());
            recs.push(Recommendation {
                suggestion: "Add a docs/ directory".to_string(),
                description: "Anything beyond README scope (architecture, guides, \
                              decisions) needs a home."
                    .to_string(),
                impact: max * 0.20,
                category: self.key(),
            });
        }

        let score = max * (1.0 - penalty).max(0.0);
        let mut result = AnalyzerResult::success(self.key(), score, max);
        result.issues = issues;
        result.recommendations = recs;
        result = result
            .with_metric("has_license", json!(has_license))
            .with_metric("has_changelog", json!(has_changelog))
            .with_metric("has_docs", json!(has_docs));
        Ok(result)
    }
}

/// Required metadata fields missing from the manifest, if one exists.
/// A project with no manifest at all is Structure's problem, not ours.
fn missing_manifest_fields(ctx: &AnalyzerContext) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if let Ok(content) = std::fs::read_to_string(ctx.root.join("package.json")) {
        if let Ok(pkg) = serde_json::from_str::<serde_json::Value>(&content) {
            for field in ["description", "license", "repository"] {
                if pkg.get(field).is_none() {
                    missing.push(field);
                }
            }
            return missing;
        }
    }

    if let Ok(content) = std::fs::read_to_string(ctx.root.join("Cargo.toml")) {
        if let Ok(manifest) = content.parse::<toml::Table>() {
            if let Some(package) = manifest.get("package").and_then(|p| p.as_table()) {
                for field in ["description", "license", "repository"] {
                    if !package.contains_key(field) {
                        missing.push(field);
                    }
                }
            }
            return missing;
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::base::tests::test_context;

    #[test]
    fn test_complete_project_scores_full() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "x", "description": "d", "license": "MIT", "repository": "r"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();
        std::fs::write(dir.path().join("CHANGELOG.md"), "# 1.0.0\n").unwrap();

        let ctx = test_context(dir.path(), 5.0);
        let result = CompletenessAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.score, 5.0);
    }

    #[test]
    fn test_missing_manifest_fields_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"name": "x"}"#).unwrap();

        let ctx = test_context(dir.path(), 5.0);
        let result = CompletenessAnalyzer.analyze(&ctx).unwrap();
        assert!(result
            .issues
            .iter()
            .any(|i| i.contains("description") && i.contains("license")));
        assert!(result.score < 5.0);
    }
}
