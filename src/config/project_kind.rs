//! Project kind detection
//!
//! The detected kind is informational metadata on the report and lets
//! analyzers adjust expectations (a CLI tool is not penalized for having
//! no public/ directory, a Rust crate is not expected to have package.json).

use crate::models::ProjectMetadata;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detected flavor of the project under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    /// React single-page app or webapp
    ReactWebapp,
    /// Vue single-page app or webapp
    VueWebapp,
    /// Node.js HTTP API (express, fastify, koa, ...)
    NodeApi,
    /// Node.js command-line tool
    NodeCli,
    /// Rust crate or workspace
    RustCrate,
    /// Python package
    PythonPackage,
    /// Anything else
    #[default]
    Generic,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectKind::ReactWebapp => "react-webapp",
            ProjectKind::VueWebapp => "vue-webapp",
            ProjectKind::NodeApi => "node-api",
            ProjectKind::NodeCli => "node-cli",
            ProjectKind::RustCrate => "rust-crate",
            ProjectKind::PythonPackage => "python-package",
            ProjectKind::Generic => "generic",
        };
        write!(f, "{}", s)
    }
}

impl ProjectKind {
    /// Detect project kind from manifest files in the root.
    ///
    /// Each kind gets a marker score; the highest wins, with Generic as the
    /// fallback when nothing scores.
    pub fn detect(root: &Path) -> ProjectKind {
        let package_json = read_json(&root.join("package.json"));

        let mut scores: Vec<(ProjectKind, u32)> = vec![
            (ProjectKind::ReactWebapp, score_react(package_json.as_ref())),
            (ProjectKind::VueWebapp, score_vue(package_json.as_ref())),
            (ProjectKind::NodeApi, score_node_api(package_json.as_ref())),
            (
                ProjectKind::NodeCli,
                score_node_cli(package_json.as_ref()),
            ),
            (ProjectKind::RustCrate, score_rust(root)),
            (ProjectKind::PythonPackage, score_python(root)),
        ];
        scores.sort_by(|a, b| b.1.cmp(&a.1));

        if scores[0].1 == 0 {
            return ProjectKind::Generic;
        }
        scores[0].0
    }
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn has_dependency(pkg: Option<&serde_json::Value>, name: &str) -> bool {
    let Some(pkg) = pkg else { return false };
    for section in ["dependencies", "devDependencies"] {
        if pkg
            .get(section)
            .and_then(|d| d.get(name))
            .is_some()
        {
            return true;
        }
    }
    false
}

fn score_react(pkg: Option<&serde_json::Value>) -> u32 {
    let mut score = 0;
    if has_dependency(pkg, "react") {
        score += 3;
    }
    if has_dependency(pkg, "react-dom") {
        score += 2;
    }
    if has_dependency(pkg, "next") {
        score += 1;
    }
    score
}

fn score_vue(pkg: Option<&serde_json::Value>) -> u32 {
    let mut score = 0;
    if has_dependency(pkg, "vue") {
        score += 3;
    }
    if has_dependency(pkg, "nuxt") {
        score += 2;
    }
    score
}

fn score_node_api(pkg: Option<&serde_json::Value>) -> u32 {
    let mut score = 0;
    for framework in ["express", "fastify", "koa", "hapi", "@nestjs/core"] {
        if has_dependency(pkg, framework) {
            score += 3;
            break;
        }
    }
    score
}

fn score_node_cli(pkg: Option<&serde_json::Value>) -> u32 {
    let mut score = 0;
    if let Some(pkg) = pkg {
        if pkg.get("bin").is_some() {
            score += 3;
        }
        for cli_dep in ["commander", "yargs", "inquirer"] {
            if has_dependency(Some(pkg), cli_dep) {
                score += 1;
            }
        }
    }
    score
}

fn score_rust(root: &Path) -> u32 {
    if root.join("Cargo.toml").exists() {
        4
    } else {
        0
    }
}

fn score_python(root: &Path) -> u32 {
    let mut score = 0;
    if root.join("pyproject.toml").exists() {
        score += 3;
    }
    if root.join("setup.py").exists() {
        score += 2;
    }
    if root.join("requirements.txt").exists() {
        score += 1;
    }
    score
}

/// Build the immutable project metadata for a run.
///
/// Name and version come from the first manifest found (package.json,
/// Cargo.toml, pyproject.toml); the directory name is the fallback.
pub fn detect_metadata(root: &Path) -> ProjectMetadata {
    let kind = ProjectKind::detect(root);
    let (name, version) = project_identity(root);
    ProjectMetadata {
        root: root.to_path_buf(),
        kind,
        name,
        version,
        analyzed_at: Utc::now(),
    }
}

fn project_identity(root: &Path) -> (String, Option<String>) {
    if let Some(pkg) = read_json(&root.join("package.json")) {
        let name = pkg.get("name").and_then(|v| v.as_str()).map(String::from);
        let version = pkg
            .get("version")
            .and_then(|v| v.as_str())
            .map(String::from);
        if let Some(name) = name {
            return (name, version);
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("Cargo.toml")) {
        if let Ok(manifest) = content.parse::<toml::Table>() {
            if let Some(package) = manifest.get("package").and_then(|p| p.as_table()) {
                let name = package.get("name").and_then(|v| v.as_str()).map(String::from);
                let version = package
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                if let Some(name) = name {
                    return (name, version);
                }
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("pyproject.toml")) {
        if let Ok(manifest) = content.parse::<toml::Table>() {
            if let Some(project) = manifest.get("project").and_then(|p| p.as_table()) {
                let name = project.get("name").and_then(|v| v.as_str()).map(String::from);
                let version = project
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                if let Some(name) = name {
                    return (name, version);
                }
            }
        }
    }

    let fallback = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    (fallback, None)
}
