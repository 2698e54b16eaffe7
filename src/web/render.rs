// src/web/render.rs
//! Server-side HTML for the input form and the analysis report

use crate::analysis::{AnalysisReport, CheckValue, Label};
use crate::utils::{escape_html, humanize_key};
use crate::web::types::AnalyzeForm;
use std::fmt::Write;

pub const MISSING_FIELDS_WARNING: &str = "Please fill in all required fields.";

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f7f8fa; color: #1f2933; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 340px; padding: 1.5rem; background: #ffffff; border-right: 1px solid #e4e7eb; }
.main { flex: 1; padding: 2rem 3rem; }
label { display: block; font-weight: 600; margin-top: 0.8rem; }
input, textarea { width: 100%; box-sizing: border-box; padding: 0.45rem; margin-top: 0.25rem; border: 1px solid #cbd2d9; border-radius: 4px; }
textarea { min-height: 6rem; }
button { margin-top: 1.2rem; width: 100%; padding: 0.6rem; background: #3e4c59; color: #fff; border: none; border-radius: 4px; font-size: 1rem; cursor: pointer; }
.warning { background-color: #fff3cd; border-left: 6px solid #ffc107; padding: 1rem; margin: 1rem 0; }
.success { background-color: #d4edda; border-left: 6px solid #28a745; padding: 1rem; margin: 1rem 0; }
.error { background-color: #f8d7da; border-left: 6px solid #dc3545; padding: 1rem; margin: 1rem 0; }
.badge { display: inline-block; padding: 0.4rem 1rem; border-radius: 999px; font-weight: 700; color: #fff; }
.badge-legitimate { background: #28a745; }
.badge-suspicious { background: #dc3545; }
.progress { background: #e4e7eb; border-radius: 4px; height: 14px; width: 100%; max-width: 420px; }
.progress-bar { background: #3e4c59; height: 14px; border-radius: 4px; }
table { border-collapse: collapse; margin: 0.5rem 0 1rem; }
td { padding: 0.3rem 1.2rem 0.3rem 0; }
.narrative { white-space: pre-wrap; background: #ffffff; border: 1px solid #e4e7eb; padding: 1rem; }
"#;

/// Display form of a single check result
pub fn format_check(value: &CheckValue) -> String {
    match value {
        CheckValue::Rating(Some(rating)) => format!("📊 {:.1}", rating),
        CheckValue::Rating(None) => "❓ Unknown".to_string(),
        other => match other.passed() {
            Some(true) => "✅ Passed".to_string(),
            _ => "❌ Failed".to_string(),
        },
    }
}

pub fn form_page(form: &AnalyzeForm, warning: Option<&str>) -> String {
    let mut main = String::new();
    if let Some(message) = warning {
        let _ = write!(main, r#"<div class="warning">⚠️ {}</div>"#, escape_html(message));
    }
    main.push_str(
        "<p>Enter the details of a job posting in the sidebar and press \
         <strong>Analyze Job Posting</strong> to check whether it looks legitimate.</p>",
    );
    page(form, &main)
}

pub fn report_page(form: &AnalyzeForm, report: &AnalysisReport) -> String {
    page(form, &report_section(report))
}

fn report_section(report: &AnalysisReport) -> String {
    let mut html = String::new();
    let prediction = &report.prediction;
    let percent = prediction.confidence_percent();
    let badge_class = match prediction.label {
        Label::Legitimate => "badge-legitimate",
        Label::Suspicious => "badge-suspicious",
    };

    let _ = write!(
        html,
        r#"<h2>Analysis Results</h2>
<p>{} at {}</p>
<h3>Prediction</h3>
<span class="badge {}">{}</span>
<p>Confidence: {}%</p>
<div class="progress"><div class="progress-bar" style="width: {}%"></div></div>
<p><small>Model: {}</small></p>"#,
        escape_html(&report.job_title),
        escape_html(&report.company_name),
        badge_class,
        prediction.label,
        percent,
        percent,
        escape_html(&prediction.model),
    );

    html.push_str("<h3>Detailed Checks</h3><table>");
    for (key, value) in report.checks.entries() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&humanize_key(key)),
            format_check(&value)
        );
    }
    html.push_str("</table>");

    let description = &report.description_analysis;
    let _ = write!(
        html,
        "<h3>Description Analysis</h3><table>\
         <tr><td>Red flags</td><td>{}</td></tr>\
         <tr><td>Suspicious patterns</td><td>{}</td></tr>\
         <tr><td>Risk score</td><td>{}</td></tr></table>",
        description.red_flag_count, description.suspicious_pattern_count, description.risk_score
    );

    if let Some(url) = &report.url_assessment {
        let _ = write!(
            html,
            "<h3>URL Checks</h3><table>\
             <tr><td>{}</td><td></td></tr>\
             <tr><td>Valid URL</td><td>{}</td></tr>\
             <tr><td>Verified job board</td><td>{}</td></tr></table>",
            escape_html(&url.url),
            format_check(&CheckValue::Flag(url.is_valid)),
            format_check(&CheckValue::Flag(url.on_verified_job_board)),
        );
    }

    html.push_str("<h3>Risk Factors</h3>");
    if report.risk_factors.is_empty() {
        html.push_str(r#"<div class="success">✅ No major risk factors detected.</div>"#);
    } else {
        for factor in &report.risk_factors {
            let _ = write!(
                html,
                r#"<div class="warning">⚠️ {}</div>"#,
                escape_html(factor.as_str())
            );
        }
    }

    if let Some(narrative) = &report.narrative {
        let _ = write!(
            html,
            r#"<h3>Model Explanation</h3>
<p><strong>{}</strong> ({}% confidence)</p>
<div class="narrative">{}</div>"#,
            narrative.label.as_str(),
            narrative.confidence_percent,
            escape_html(&narrative.text)
        );
    } else if let Some(error) = &report.narrative_error {
        let _ = write!(
            html,
            r#"<h3>Model Explanation</h3><div class="error">Explanation unavailable: {}</div>"#,
            escape_html(error)
        );
    }

    html
}

fn page(form: &AnalyzeForm, main: &str) -> String {
    let text_input = |name: &str, label: &str, value: &str| {
        format!(
            r#"<label for="{name}">{label}</label><input type="text" id="{name}" name="{name}" value="{}">"#,
            escape_html(value)
        )
    };
    let text_area = |name: &str, label: &str, value: &str| {
        format!(
            r#"<label for="{name}">{label}</label><textarea id="{name}" name="{name}">{}</textarea>"#,
            escape_html(value)
        )
    };

    let fields = [
        text_input("company_name", "Company Name *", &form.company_name),
        text_input("job_title", "Job Title *", &form.job_title),
        text_area("job_description", "Job Description *", &form.job_description),
        text_input("job_url", "Job Posting URL", &form.job_url),
        text_area("company_profile", "Company Profile", &form.company_profile),
        text_area("requirements", "Requirements", &form.requirements),
        text_area("benefits", "Benefits", &form.benefits),
        text_input("country", "Country (US or UK)", &form.country),
    ]
    .concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Job Legitimacy Checker</title>
<style>{STYLE}</style>
</head>
<body>
<div class="layout">
<aside class="sidebar">
<h2>Job Details</h2>
<form method="post" action="/analyze">
{fields}
<button type="submit">Analyze Job Posting</button>
</form>
</aside>
<main class="main">
<h1>🛡️ Job Legitimacy Checker</h1>
{main}
</main>
</div>
</body>
</html>"#
    )
}
