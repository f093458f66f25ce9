//! CI output emission for gate reports
//!
//! Maps one `GatesReport` onto each CI platform's expected syntax:
//! - `github-actions` - workflow commands plus a step-summary markdown table
//! - `gitlab-ci` - Code Quality JSON artifact
//! - `jenkins` - JUnit-style XML, one test case per gate
//! - `generic` - plain JSON of the report
//! - `console` - human-readable terminal output
//!
//! Format selection is presentation only; the pass/fail semantics live in
//! the report and are identical across formats.

use super::{GateResult, GatesReport};
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported CI output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiFormat {
    GithubActions,
    GitlabCi,
    Jenkins,
    Generic,
    Console,
}

impl FromStr for CiFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github-actions" | "github" => Ok(CiFormat::GithubActions),
            "gitlab-ci" | "gitlab" => Ok(CiFormat::GitlabCi),
            "jenkins" => Ok(CiFormat::Jenkins),
            "generic" => Ok(CiFormat::Generic),
            "console" => Ok(CiFormat::Console),
            _ => Err(anyhow!(
                "Unknown CI format '{}'. Valid formats: auto, github-actions, gitlab-ci, jenkins, generic, console",
                s
            )),
        }
    }
}

impl std::fmt::Display for CiFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CiFormat::GithubActions => "github-actions",
            CiFormat::GitlabCi => "gitlab-ci",
            CiFormat::Jenkins => "jenkins",
            CiFormat::Generic => "generic",
            CiFormat::Console => "console",
        };
        write!(f, "{}", s)
    }
}

impl CiFormat {
    /// Resolve a format argument, where "auto" sniffs the CI environment.
    pub fn resolve(s: &str) -> Result<CiFormat> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(Self::detect())
        } else {
            s.parse()
        }
    }

    /// Detect the surrounding CI platform from its marker variables.
    /// Falls back to `console` outside CI, `generic` in unrecognized CI.
    pub fn detect() -> CiFormat {
        if std::env::var_os("GITHUB_ACTIONS").is_some() {
            CiFormat::GithubActions
        } else if std::env::var_os("GITLAB_CI").is_some() {
            CiFormat::GitlabCi
        } else if std::env::var_os("JENKINS_URL").is_some() {
            CiFormat::Jenkins
        } else if std::env::var_os("CI").is_some() {
            CiFormat::Generic
        } else {
            CiFormat::Console
        }
    }
}

/// Render a gates report in the requested CI format
pub fn render(report: &GatesReport, format: CiFormat) -> Result<String> {
    match format {
        CiFormat::GithubActions => Ok(render_github_actions(report)),
        CiFormat::GitlabCi => render_gitlab(report),
        CiFormat::Jenkins => Ok(render_jenkins(report)),
        CiFormat::Generic => Ok(serde_json::to_string_pretty(report)?),
        CiFormat::Console => Ok(render_console(report)),
    }
}

/// GitHub workflow commands plus a step-summary markdown table
fn render_github_actions(report: &GatesReport) -> String {
    let mut out = String::new();

    for gate in &report.gates {
        if !gate.passed {
            out.push_str(&format!("::error title=Quality gate '{}'::{}\n", gate.name, gate.message));
        } else if gate.warning {
            out.push_str(&format!(
                "::warning title=Quality gate '{}'::{}\n",
                gate.name, gate.message
            ));
        }
    }

    out.push_str("\n## Quality Gates\n\n");
    out.push_str(&format!(
        "**{}** — {}/{} gates passed ({:.0}% pass rate)\n\n",
        if report.passed { "PASSED" } else { "FAILED" },
        report.summary.passed,
        report.summary.total,
        report.summary.pass_rate
    ));
    out.push_str("| Gate | Score | Minimum | Status |\n");
    out.push_str("|------|-------|---------|--------|\n");
    for gate in &report.gates {
        out.push_str(&format!(
            "| {} | {:.1} | {:.1} | {} |\n",
            gate.name,
            gate.score,
            gate.threshold,
            status_word(gate)
        ));
    }
    out
}

/// GitLab Code Quality artifact: one entry per non-passing gate
fn render_gitlab(report: &GatesReport) -> Result<String> {
    let entries: Vec<serde_json::Value> = report
        .gates
        .iter()
        .filter(|g| !g.passed || g.warning)
        .map(|g| {
            serde_json::json!({
                "description": g.message,
                "check_name": format!("quality-gate-{}", g.name),
                "fingerprint": g.name,
                "severity": if !g.passed { "major" } else { "minor" },
                "location": {
                    "path": "scorecard",
                    "lines": { "begin": 1 }
                }
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// JUnit-style XML, one test case per gate, consumable by Jenkins
fn render_jenkins(report: &GatesReport) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<testsuite name=\"quality-gates\" tests=\"{}\" failures=\"{}\">\n",
        report.summary.total, report.summary.failed
    ));
    for gate in &report.gates {
        if gate.passed {
            out.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"scorecard.gates\"/>\n",
                xml_escape(&gate.name)
            ));
        } else {
            out.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"scorecard.gates\">\n    <failure message=\"{}\"/>\n  </testcase>\n",
                xml_escape(&gate.name),
                xml_escape(&gate.message)
            ));
        }
    }
    out.push_str("</testsuite>\n");
    out
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Human-readable terminal rendering
fn render_console(report: &GatesReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}Quality Gates{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    for gate in &report.gates {
        let (color, tag) = if !gate.passed {
            (RED, "FAIL")
        } else if gate.warning {
            (YELLOW, "WARN")
        } else {
            (GREEN, "PASS")
        };
        let blocking = if gate.blocking { " [blocking]" } else { "" };
        out.push_str(&format!(
            "  {color}{tag}{RESET}  {:<14} {:>6.1} / min {:.1}{DIM}{blocking}{RESET}\n",
            gate.name, gate.score, gate.threshold
        ));
    }

    let verdict = if report.passed {
        format!("{GREEN}{BOLD}PASSED{RESET}")
    } else {
        format!("{RED}{BOLD}FAILED{RESET}")
    };
    out.push_str(&format!(
        "\n  {} — {}/{} gates passed, {} warnings\n",
        verdict, report.summary.passed, report.summary.total, report.summary.warnings
    ));
    out
}

fn status_word(gate: &GateResult) -> &'static str {
    if !gate.passed {
        "❌ fail"
    } else if gate.warning {
        "⚠️ warn"
    } else {
        "✅ pass"
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{GatesReport, GatesSummary};
    use chrono::Utc;

    fn sample_report(passed: bool) -> GatesReport {
        let gate = GateResult {
            name: "overall".to_string(),
            score: 65.0,
            threshold: 70.0,
            warn_threshold: 80.0,
            blocking: true,
            passed,
            warning: false,
            message: if passed {
                "overall score 65.0 meets the minimum 60.0".to_string()
            } else {
                "overall score 65.0 is below the minimum 70.0".to_string()
            },
            issues: vec![],
        };
        GatesReport {
            summary: GatesSummary {
                total: 1,
                passed: usize::from(passed),
                failed: usize::from(!passed),
                warnings: 0,
                pass_rate: if passed { 100.0 } else { 0.0 },
            },
            gates: vec![gate],
            passed,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(CiFormat::from_str("github-actions").unwrap(), CiFormat::GithubActions);
        assert_eq!(CiFormat::from_str("GitLab-CI").unwrap(), CiFormat::GitlabCi);
        assert_eq!(CiFormat::from_str("jenkins").unwrap(), CiFormat::Jenkins);
        assert!(CiFormat::from_str("teamcity").is_err());
    }

    #[test]
    fn test_github_emits_error_annotation_on_failure() {
        let out = render(&sample_report(false), CiFormat::GithubActions).unwrap();
        assert!(out.contains("::error title=Quality gate 'overall'::"));
        assert!(out.contains("| overall | 65.0 | 70.0 |"));
        assert!(out.contains("**FAILED**"));
    }

    #[test]
    fn test_github_no_annotations_on_pass() {
        let out = render(&sample_report(true), CiFormat::GithubActions).unwrap();
        assert!(!out.contains("::error"));
        assert!(out.contains("**PASSED**"));
    }

    #[test]
    fn test_gitlab_entries_only_for_problem_gates() {
        let out = render(&sample_report(false), CiFormat::GitlabCi).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["severity"], "major");

        let out = render(&sample_report(true), CiFormat::GitlabCi).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_jenkins_xml_shape() {
        let out = render(&sample_report(false), CiFormat::Jenkins).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("tests=\"1\" failures=\"1\""));
        assert!(out.contains("<failure message="));
    }

    #[test]
    fn test_generic_json_round_trips() {
        let out = render(&sample_report(false), CiFormat::Generic).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["passed"], false);
        assert_eq!(parsed["summary"]["total"], 1);
    }

    #[test]
    fn test_format_does_not_change_semantics() {
        let report = sample_report(false);
        for format in [
            CiFormat::GithubActions,
            CiFormat::GitlabCi,
            CiFormat::Jenkins,
            CiFormat::Generic,
            CiFormat::Console,
        ] {
            render(&report, format).unwrap();
            assert!(!report.passed, "rendering must not mutate the report");
        }
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
