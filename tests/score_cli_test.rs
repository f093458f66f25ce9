//! Score command contract tests
//!
//! Drives the compiled binary against fixture projects and verifies the
//! score command's flags, formats, and exit codes.

use std::path::Path;
use std::process::Command;

fn scorecard_bin() -> &'static str {
    env!("CARGO_BIN_EXE_scorecard")
}

/// A tidy fixture project that should score well across every category
fn setup_good_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("tests")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::create_dir_all(root.join(".github/workflows")).unwrap();

    std::fs::write(
        root.join("Cargo.toml"),
        "[package]\nname = \"fixture\"\nversion = \"0.1.0\"\ndescription = \"fixture\"\nlicense = \"MIT\"\nrepository = \"https://example.com/fixture\"\n",
    )
    .unwrap();
    std::fs::write(
        root.join("src/lib.rs"),
        "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("tests/add_test.rs"),
        "#[test]\nfn adds() {\n    assert_eq!(1 + 1, 2);\n}\n",
    )
    .unwrap();
    std::fs::write(root.join("README.md"), "# Fixture\n\n".repeat(40)).unwrap();
    std::fs::write(root.join(".gitignore"), "target/\n").unwrap();
    std::fs::write(root.join(".editorconfig"), "root = true\n").unwrap();
    std::fs::write(root.join("Makefile"), "test:\n\tcargo test\n").unwrap();
    std::fs::write(root.join("CONTRIBUTING.md"), "# Contributing\n").unwrap();
    std::fs::write(root.join("LICENSE"), "MIT\n").unwrap();
    std::fs::write(root.join("CHANGELOG.md"), "# 0.1.0\n").unwrap();
    std::fs::write(
        root.join(".github/workflows/ci.yml"),
        "on: push\njobs: {}\n",
    )
    .unwrap();

    dir
}

/// A bare fixture with a single script and none of the hygiene files
fn setup_poor_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.py"), "print('hello')\n").unwrap();
    dir
}

fn run_score(dir: &Path, extra_args: &[&str]) -> (i32, String, String) {
    let mut cmd = Command::new(scorecard_bin());
    cmd.arg("score").arg(dir);
    for arg in extra_args {
        cmd.arg(arg);
    }
    let output = cmd.output().expect("Failed to run scorecard");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Invalid JSON on stdout")
}

#[test]
fn json_report_has_all_categories_in_order() {
    let repo = setup_good_repo();
    let (code, stdout, _) = run_score(repo.path(), &["--format", "json"]);
    assert_eq!(code, 0);

    let report = parse_json(&stdout);
    let categories = report["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);

    let keys: Vec<&str> = categories
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec![
            "structure",
            "quality",
            "performance",
            "testing",
            "security",
            "devexp",
            "completeness"
        ]
    );
    assert_eq!(report["overall"]["max_score"], 100.0);
}

#[test]
fn good_repo_scores_high() {
    let repo = setup_good_repo();
    let (code, stdout, _) = run_score(repo.path(), &["--format", "json"]);
    assert_eq!(code, 0);

    let report = parse_json(&stdout);
    let score = report["overall"]["score"].as_f64().unwrap();
    assert!(score >= 90.0, "expected >= 90, got {}", score);
    assert_eq!(report["overall"]["has_errors"], false);
}

#[test]
fn poor_repo_scores_low_with_recommendations() {
    let repo = setup_poor_repo();
    let (code, stdout, _) = run_score(repo.path(), &["--format", "json"]);
    assert_eq!(code, 0, "a low score is not an error");

    let report = parse_json(&stdout);
    let score = report["overall"]["score"].as_f64().unwrap();
    assert!(score < 70.0, "expected < 70, got {}", score);

    let recs = report["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());
    // Sorted by descending impact
    let impacts: Vec<f64> = recs.iter().map(|r| r["impact"].as_f64().unwrap()).collect();
    for w in impacts.windows(2) {
        assert!(w[0] >= w[1], "recommendations not sorted: {:?}", impacts);
    }
}

#[test]
fn category_subset_keeps_subset_weights() {
    let repo = setup_good_repo();
    let (code, stdout, _) = run_score(
        repo.path(),
        &["--categories", "quality,testing", "--format", "json"],
    );
    assert_eq!(code, 0);

    let report = parse_json(&stdout);
    assert_eq!(report["categories"].as_array().unwrap().len(), 2);
    // No renormalization: 20 + 15
    assert_eq!(report["overall"]["max_score"], 35.0);
}

#[test]
fn unknown_category_fails_fast() {
    let repo = setup_good_repo();
    let (code, _, stderr) = run_score(repo.path(), &["--categories", "quality,nonsense"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("nonsense"), "stderr: {}", stderr);
}

#[test]
fn html_output_written_to_file() {
    let repo = setup_good_repo();
    let out_path = repo.path().join("report.html");
    let (code, _, _) = run_score(
        repo.path(),
        &["--format", "html", "-o", out_path.to_str().unwrap()],
    );
    assert_eq!(code, 0);

    let html = std::fs::read_to_string(&out_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("fixture"));
}

#[test]
fn malformed_config_is_fatal() {
    let repo = setup_poor_repo();
    std::fs::write(repo.path().join("scorecard.toml"), "not [valid toml").unwrap();

    let (code, _, stderr) = run_score(repo.path(), &["--format", "json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("malformed"), "stderr: {}", stderr);
}

#[test]
fn weight_overrides_flow_into_report() {
    let repo = setup_good_repo();
    std::fs::write(
        repo.path().join("scorecard.toml"),
        "[categories.quality]\nweight = 25\n\n[categories.structure]\nweight = 15\n",
    )
    .unwrap();

    let (code, stdout, _) = run_score(repo.path(), &["--format", "json"]);
    assert_eq!(code, 0);

    let report = parse_json(&stdout);
    let quality = report["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["key"] == "quality")
        .unwrap();
    assert_eq!(quality["max_score"], 25.0);
    assert_eq!(report["overall"]["max_score"], 100.0);
}

#[test]
fn console_output_shows_grade_and_categories() {
    let repo = setup_good_repo();
    let (code, stdout, _) = run_score(repo.path(), &["--detailed", "--recommendations"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Scorecard"));
    assert!(stdout.contains("Code Quality"));
    assert!(stdout.contains("Grade:"));
}
