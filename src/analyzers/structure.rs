//! Structure analyzer
//!
//! Scores project layout: a dedicated source directory, a recognizable
//! manifest, repository hygiene files, and sane directory depth.

use crate::analyzers::base::{has_source_extension, Analyzer, AnalyzerContext};
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use serde_json::json;

const SOURCE_DIRS: &[&str] = &["src", "lib", "app", "source"];
const MANIFESTS: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "setup.py",
    "go.mod",
    "pom.xml",
];

pub struct StructureAnalyzer;

impl Analyzer for StructureAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Structure
    }

    fn description(&self) -> &'static str {
        "Checks source layout, manifest presence, and repository hygiene"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        ctx.ensure_active()?;
        let max = ctx.max_score;
        let mut penalty: f64 = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        let has_source_dir = SOURCE_DIRS.iter().any(|d| ctx.root.join(d).is_dir());
        if !has_source_dir {
            penalty += 0.30;
            issues.push("No dedicated source directory (src/, lib/, app/)".to_string());
            recs.push(Recommendation {
                suggestion: "Move source code into a src/ directory".to_string(),
                description: "A dedicated source directory separates code from config and \
                              makes the layout predictable for tools and newcomers."
                    .to_string(),
                impact: max * 0.30,
                category: self.key(),
            });
        }

        let has_manifest = MANIFESTS.iter().any(|m| ctx.root.join(m).is_file());
        if !has_manifest {
            penalty += 0.25;
            issues.push("No project manifest found".to_string());
            recs.push(Recommendation {
                suggestion: "Add a project manifest".to_string(),
                description: "A manifest (package.json, Cargo.toml, pyproject.toml, ...) \
                              declares dependencies and metadata for the ecosystem's tooling."
                    .to_string(),
                impact: max * 0.25,
                category: self.key(),
            });
        }

        let has_readme = ["README.md", "README.rst", "README.txt", "README"]
            .iter()
            .any(|r| ctx.root.join(r).is_file());
        if !has_readme {
            penalty += 0.15;
            issues.push("No README file".to_string());
            recs.push(Recommendation {
                suggestion: "Add a README".to_string(),
                description: "A README is the entry point for anyone evaluating or using \
                              the project."
                    .to_string(),
                impact: max * 0.15,
                category: self.key(),
            });
        }

        if !ctx.root.join(".gitignore").is_file() {
            penalty += 0.10;
            issues.push("No .gitignore file".to_string());
            recs.push(Recommendation {
                suggestion: "Add a .gitignore".to_string(),
                description: "Without a .gitignore, build artifacts and editor files end \
                              up committed."
                    .to_string(),
                impact: max * 0.10,
                category: self.key(),
            });
        }

        let max_depth = deepest_directory(ctx)?;
        if max_depth > 7 {
            penalty += 0.10;
            issues.push(format!(
                "Directory nesting is {} levels deep (7 is plenty)",
                max_depth
            ));
            recs.push(Recommendation {
                suggestion: "Flatten deeply nested directories".to_string(),
                description: "Deep nesting makes paths unwieldy and usually signals \
                              over-segmented modules."
                    .to_string(),
                impact: max * 0.10,
                category: self.key(),
            });
        }

        let root_sources = root_level_source_files(ctx);
        if root_sources > 5 {
            penalty += 0.10;
            issues.push(format!(
                "{} source files sit at the project root",
                root_sources
            ));
            recs.push(Recommendation {
                suggestion: "Move root-level source files into the source directory".to_string(),
                description: "Source files scattered at the root blur the project entry \
                              points."
                    .to_string(),
                impact: max * 0.10,
                category: self.key(),
            });
        }

        let score = max * (1.0 - penalty).max(0.0);
        let mut result = AnalyzerResult::success(self.key(), score, max);
        result.issues = issues;
        result.recommendations = recs;
        result = result
            .with_metric("has_source_dir", json!(has_source_dir))
            .with_metric("has_manifest", json!(has_manifest))
            .with_metric("max_depth", json!(max_depth))
            .with_metric("root_source_files", json!(root_sources));
        Ok(result)
    }
}

/// Deepest directory level below the root, gitignore-aware
fn deepest_directory(ctx: &AnalyzerContext) -> Result<usize> {
    let mut deepest = 0;
    for entry in ignore::WalkBuilder::new(&ctx.root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        ctx.ensure_active()?;
        if entry.file_type().is_some_and(|t| t.is_dir()) {
            deepest = deepest.max(entry.depth());
        }
    }
    Ok(deepest)
}

fn root_level_source_files(ctx: &AnalyzerContext) -> usize {
    std::fs::read_dir(&ctx.root)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().is_file() && has_source_extension(&e.path()))
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::base::tests::test_context;

    #[test]
    fn test_well_structured_project_scores_full() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"x\"\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# x\n").unwrap();
        std::fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();

        let ctx = test_context(dir.path(), 20.0);
        let result = StructureAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.score, 20.0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_bare_directory_penalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();

        let ctx = test_context(dir.path(), 20.0);
        let result = StructureAnalyzer.analyze(&ctx).unwrap();
        assert!(result.score < 10.0, "score was {}", result.score);
        assert!(!result.issues.is_empty());
        assert!(!result.recommendations.is_empty());
        // Every recommendation carries the points it would recover
        assert!(result.recommendations.iter().all(|r| r.impact > 0.0));
    }
}
