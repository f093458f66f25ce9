//! Standalone HTML reporter
//!
//! Produces a single self-contained page (inline CSS, no external assets)
//! so the report can be archived as a CI artifact and opened anywhere.

use crate::models::ScoreReport;
use anyhow::Result;

/// Render report as a standalone HTML page
pub fn render(report: &ScoreReport) -> Result<String> {
    let mut out = String::with_capacity(8 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>Scorecard — {}</title>\n",
        escape(&report.metadata.name)
    ));
    out.push_str(
        "<style>\n\
         body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 2rem auto; max-width: 860px; color: #1a1a2e; }\n\
         h1 { margin-bottom: 0; }\n\
         .meta { color: #666; margin-bottom: 1.5rem; }\n\
         .score { font-size: 3rem; font-weight: 700; }\n\
         .grade { display: inline-block; padding: 0.2em 0.6em; border-radius: 8px; color: #fff; font-size: 2rem; vertical-align: middle; margin-left: 0.5rem; }\n\
         .grade-a { background: #2e7d32; } .grade-b { background: #7cb342; }\n\
         .grade-c { background: #f9a825; } .grade-d { background: #ef6c00; } .grade-f { background: #c62828; }\n\
         table { border-collapse: collapse; width: 100%; margin: 1.5rem 0; }\n\
         th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e0e0e0; }\n\
         .bar { background: #eee; border-radius: 4px; height: 8px; width: 160px; }\n\
         .bar > div { background: #4a67d8; border-radius: 4px; height: 8px; }\n\
         .issues { color: #777; font-size: 0.9rem; margin: 0.25rem 0 0 0; padding-left: 1.2rem; }\n\
         .error { color: #c62828; }\n\
         </style>\n</head>\n<body>\n",
    );

    out.push_str(&format!("<h1>{}</h1>\n", escape(&report.metadata.name)));
    out.push_str(&format!(
        "<p class=\"meta\">{} · {} · analyzed {}</p>\n",
        report
            .metadata
            .version
            .as_deref()
            .map(|v| format!("v{}", escape(v)))
            .unwrap_or_else(|| "unversioned".to_string()),
        report.metadata.kind,
        report.metadata.analyzed_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str(&format!(
        "<div><span class=\"score\">{:.1}<small>/{:.0}</small></span><span class=\"grade {}\">{}</span></div>\n",
        report.overall.score,
        report.overall.max_score,
        grade_class(&report.overall.grade),
        escape(&report.overall.grade)
    ));
    if report.overall.has_errors {
        out.push_str("<p class=\"error\">Some analyzers failed; affected categories scored 0.</p>\n");
    }

    out.push_str("<table>\n<tr><th>Category</th><th>Score</th><th></th><th>Grade</th></tr>\n");
    for c in &report.categories {
        let pct = if c.max_score > 0.0 {
            (c.score / c.max_score * 100.0).round() as u32
        } else {
            0
        };
        out.push_str(&format!(
            "<tr><td>{}</td><td>{:.1} / {:.0}</td>\
             <td><div class=\"bar\"><div style=\"width: {}%\"></div></div></td>\
             <td><span class=\"grade {}\" style=\"font-size: 1rem\">{}</span></td></tr>\n",
            escape(&c.name),
            c.score,
            c.max_score,
            pct,
            grade_class(&c.grade),
            escape(&c.grade)
        ));
        if !c.issues.is_empty() {
            out.push_str("<tr><td colspan=\"4\"><ul class=\"issues\">");
            for issue in &c.issues {
                out.push_str(&format!("<li>{}</li>", escape(issue)));
            }
            out.push_str("</ul></td></tr>\n");
        }
    }
    out.push_str("</table>\n");

    if !report.recommendations.is_empty() {
        out.push_str("<h2>Recommendations</h2>\n<ol>\n");
        for rec in &report.recommendations {
            out.push_str(&format!(
                "<li><strong>{}</strong> (+{:.1} pts, {}) — {}</li>\n",
                escape(&rec.suggestion),
                rec.impact,
                rec.category,
                escape(&rec.description)
            ));
        }
        out.push_str("</ol>\n");
    }

    out.push_str("</body>\n</html>\n");
    Ok(out)
}

fn grade_class(grade: &str) -> &'static str {
    match grade.chars().next() {
        Some('A') => "grade-a",
        Some('B') => "grade-b",
        Some('C') => "grade-c",
        Some('D') => "grade-d",
        _ => "grade-f",
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_html_structure() {
        let report = test_report();
        let out = render(&report).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<table>"));
        assert!(out.contains("Code Quality"));
        assert!(out.contains("Recommendations"));
        assert!(out.ends_with("</html>\n"));
    }

    #[test]
    fn test_html_escapes_content() {
        let mut report = test_report();
        report.categories[0].issues = vec!["<script>alert(1)</script>".to_string()];
        let out = render(&report).unwrap();
        assert!(!out.contains("<script>alert"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
