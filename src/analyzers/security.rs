//! Security analyzer
//!
//! Pattern-based scan for hardcoded credentials, committed .env files, and
//! missing dependency lockfiles. Matches the obvious cases; it is not a
//! taint analysis.

use crate::analyzers::base::{is_test_path, source_files, Analyzer, AnalyzerContext};
use crate::config::ProjectKind;
use crate::models::{AnalyzerResult, CategoryKey, Recommendation};
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn secret_patterns() -> &'static Vec<(Regex, &'static str)> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"AKIA[0-9A-Z]{16}").expect("valid regex"),
                "AWS access key",
            ),
            (
                Regex::new(r"-----BEGIN (RSA |EC |OPENSSH )?PRIVATE KEY-----")
                    .expect("valid regex"),
                "private key material",
            ),
            (
                Regex::new(
                    r#"(?i)\b(api[_-]?key|secret|password|token)\b\s*[:=]\s*["'][^"'\s]{8,}["']"#,
                )
                .expect("valid regex"),
                "hardcoded credential",
            ),
        ]
    })
}

pub struct SecurityAnalyzer;

impl Analyzer for SecurityAnalyzer {
    fn key(&self) -> CategoryKey {
        CategoryKey::Security
    }

    fn description(&self) -> &'static str {
        "Finds hardcoded secrets, committed .env files, and missing lockfiles"
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> Result<AnalyzerResult> {
        let max = ctx.max_score;
        let mut secret_hits: Vec<String> = Vec::new();

        for path in source_files(ctx)? {
            ctx.ensure_active()?;
            if is_test_path(&path) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            for (line_num, line) in content.lines().enumerate() {
                for (pattern, label) in secret_patterns() {
                    if pattern.is_match(line) {
                        let rel = path.strip_prefix(&ctx.root).unwrap_or(&path);
                        secret_hits.push(format!(
                            "Possible {} in {}:{}",
                            label,
                            rel.display(),
                            line_num + 1
                        ));
                    }
                }
            }
        }

        let env_committed = ctx.root.join(".env").is_file();
        let missing_lockfile = needs_lockfile(ctx) && !has_lockfile(ctx);

        let mut penalty = 0.0;
        let mut issues = Vec::new();
        let mut recs = Vec::new();

        if !secret_hits.is_empty() {
            let p = (secret_hits.len() as f64 * 0.10).min(0.50);
            penalty += p;
            issues.extend(secret_hits.iter().take(10).cloned());
            recs.push(Recommendation {
                suggestion: "Move hardcoded secrets into environment configuration".to_string(),
                description: "Credentials in source are visible to anyone with repo \
                              access and live forever in git history; rotate them and \
                              load from the environment."
                    .to_string(),
                impact: max * p,
                category: self.key(),
            });
        }

        if env_committed {
            penalty += 0.20;
            issues.push(".env file present in the repository".to_string());
            recs.push(Recommendation {
                suggestion: "Remove .env from version control".to_string(),
                description: "Commit a .env.example with placeholder values instead and \
                              gitignore the real file."
                    .to_string(),
                impact: max * 0.20,
                category: self.key(),
            });
        }

        if missing_lockfile {
            penalty += 0.15;
            issues.push("No dependency lockfile found".to_string());
            recs.push(Recommendation {
                suggestion: "Commit a dependency lockfile".to_string(),
                description: "Without a lockfile, builds float to whatever versions \
                              resolve that day, including compromised ones."
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
            .with_metric("secret_hits", json!(secret_hits.len()))
            .with_metric("env_committed", json!(env_committed))
            .with_metric("missing_lockfile", json!(missing_lockfile));
        Ok(result)
    }
}

fn needs_lockfile(ctx: &AnalyzerContext) -> bool {
    matches!(
        ctx.kind,
        ProjectKind::ReactWebapp | ProjectKind::VueWebapp | ProjectKind::NodeApi | ProjectKind::NodeCli
    ) || ctx.root.join("package.json").is_file()
}

fn has_lockfile(ctx: &AnalyzerContext) -> bool {
    ["package-lock.json", "yarn.lock", "pnpm-lock.yaml", "bun.lockb"]
        .iter()
        .any(|f| ctx.root.join(f).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::base::tests::test_context;

    #[test]
    fn test_clean_project_scores_full() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("server.py"),
            "import os\nTOKEN = os.environ.get('TOKEN')\n",
        )
        .unwrap();

        let ctx = test_context(dir.path(), 15.0);
        let result = SecurityAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.score, 15.0);
    }

    #[test]
    fn test_hardcoded_credential_flagged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.js"),
            "const api_key = \"sk-abcdef1234567890\";\n",
        )
        .unwrap();

        let ctx = test_context(dir.path(), 15.0);
        let result = SecurityAnalyzer.analyze(&ctx).unwrap();
        assert!(result.score < 15.0);
        assert_eq!(result.metrics["secret_hits"], json!(1));
        assert!(result.issues[0].contains("config.js:1"));
    }

    #[test]
    fn test_env_file_flagged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "DB_PASSWORD=hunter2\n").unwrap();

        let ctx = test_context(dir.path(), 15.0);
        let result = SecurityAnalyzer.analyze(&ctx).unwrap();
        assert!(result
            .issues
            .iter()
            .any(|i| i.contains(".env file present")));
    }

    #[test]
    fn test_node_project_without_lockfile_flagged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{\"name\": \"x\"}\n").unwrap();

        let ctx = test_context(dir.path(), 15.0);
        let result = SecurityAnalyzer.analyze(&ctx).unwrap();
        assert_eq!(result.metrics["missing_lockfile"], json!(true));
    }
}
