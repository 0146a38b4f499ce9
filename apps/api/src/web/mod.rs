//! Interactive web form. A thin HTML adapter over the same pipeline the JSON API uses.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{Html, IntoResponse, Response},
};

use crate::analysis::handlers::{run_analysis, JOB_DESCRIPTION_FIELD, RESUME_FIELD};
use crate::analysis::mapper::{AnalysisResult, DetailedReport, SummaryResult};
use crate::analysis::AnalysisMode;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /
pub async fn handle_form_page() -> Html<String> {
    Html(page(""))
}

/// POST /form/match
pub async fn handle_form_match(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    render(run_analysis(&state, AnalysisMode::Summary, multipart).await)
}

/// POST /form/detailed
pub async fn handle_form_detailed(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    render(run_analysis(&state, AnalysisMode::Detailed, multipart).await)
}

fn render(outcome: Result<AnalysisResult, AppError>) -> Response {
    match outcome {
        Ok(AnalysisResult::Summary(summary)) => {
            Html(page(&summary_section(&summary))).into_response()
        }
        Ok(AnalysisResult::Detailed(report)) => {
            Html(page(&detailed_section(&report))).into_response()
        }
        Err(err) => {
            if let AppError::Internal(e) = &err {
                tracing::error!("Internal error: {e:?}");
            }
            (err.status(), Html(page(&error_section(&err)))).into_response()
        }
    }
}

fn page(result_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Smart ATS - Resume Matching</title>
</head>
<body>
    <h1>Smart ATS - Resume Matching System</h1>
    <p>Upload your resume and enter the job description to get ATS insights.</p>
    <form method="post" action="/form/match" enctype="multipart/form-data">
        <label for="{JOB_DESCRIPTION_FIELD}">Paste Job Description</label><br>
        <textarea id="{JOB_DESCRIPTION_FIELD}" name="{JOB_DESCRIPTION_FIELD}" rows="12" cols="80" required></textarea><br>
        <label for="{RESUME_FIELD}">Upload Resume (PDF)</label>
        <input id="{RESUME_FIELD}" type="file" name="{RESUME_FIELD}" accept="application/pdf" required><br>
        <button type="submit" formaction="/form/match">Get Matching Percentage</button>
        <button type="submit" formaction="/form/detailed">Get Detailed Feedback</button>
    </form>
    {result_html}
</body>
</html>"#
    )
}

fn summary_section(summary: &SummaryResult) -> String {
    format!(
        "<section><h2>Match Score: {}</h2></section>",
        html_escape(&summary.match_percentage)
    )
}

fn detailed_section(report: &DetailedReport) -> String {
    let rows = [
        ("Match Score", report.match_percentage.clone()),
        ("Missing Keywords", report.missing_keywords.join(", ")),
        ("Profile Summary", report.profile_summary.clone()),
        ("Strengths", report.strengths.clone()),
        ("Weaknesses", report.weaknesses.clone()),
        ("Recommended Courses &amp; Resources", report.recommended_resources.clone()),
    ];

    let items: String = rows
        .iter()
        .map(|(label, value)| format!("<li><strong>{label}</strong>: {}</li>", html_escape(value)))
        .collect();

    format!("<section><h2>Resume Analysis Report</h2><ul>{items}</ul></section>")
}

fn error_section(err: &AppError) -> String {
    let raw = err
        .raw_response()
        .map(|raw| {
            format!(
                "<p>Raw AI response:</p><pre>{}</pre>",
                html_escape(raw)
            )
        })
        .unwrap_or_default();

    format!(
        "<section class=\"error\"><h2>Error</h2><p>{}</p>{raw}</section>",
        html_escape(&err.user_message())
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
