//! Axum route handlers for the JSON matching API.

use anyhow::anyhow;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::analysis::mapper::{AnalysisResult, DetailedReport, MatchScore};
use crate::analysis::pipeline::analyze;
use crate::analysis::AnalysisMode;
use crate::errors::AppError;
use crate::state::AppState;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A validated upload: resume document bytes plus a non-blank job description.
#[derive(Debug)]
pub struct AnalysisUpload {
    pub resume: Bytes,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub similarity: MatchScore,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Quick match: returns only the similarity score.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let summary = run_analysis(&state, AnalysisMode::Summary, multipart)
        .await?
        .into_summary()
        .ok_or_else(|| AppError::Internal(anyhow!("summary analysis produced another shape")))?;

    Ok(Json(MatchResponse {
        similarity: summary.score(),
    }))
}

/// POST /api/v1/match/detailed
///
/// Full feedback report with the detailed schema's keys.
pub async fn handle_detailed_match(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetailedReport>, AppError> {
    let report = run_analysis(&state, AnalysisMode::Detailed, multipart)
        .await?
        .into_detailed()
        .ok_or_else(|| AppError::Internal(anyhow!("detailed analysis produced another shape")))?;

    Ok(Json(report))
}

/// Reads the upload and runs the shared pipeline. Used by both front ends.
pub async fn run_analysis(
    state: &AppState,
    mode: AnalysisMode,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<AnalysisResult, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let upload = read_upload(multipart).await?;

    let result = analyze(
        state.llm.as_ref(),
        state.model_timeout(),
        mode,
        upload.resume,
        &upload.job_description,
    )
    .await?;

    Ok(result)
}

/// Collects the `resume` file and `job_description` text parts.
pub async fn read_upload(mut multipart: Multipart) -> Result<AnalysisUpload, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                resume = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read resume upload: {e}"))
                })?);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job description: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let resume = resume
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))?;

    Ok(AnalysisUpload {
        resume,
        job_description,
    })
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::test_support::multipart_request;
    use crate::analysis::extractor::fixtures::pdf_with_pages;
    use crate::config::Config;
    use crate::llm_client::fake::FakeModelClient;
    use crate::routes::build_router;
    use crate::state::AppState;

    const JD: &str = "Backend engineer. Required: Go, Docker, AWS.";

    fn app(llm: FakeModelClient) -> Router {
        build_router(AppState {
            llm: Arc::new(llm),
            config: Config::for_tests(),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_match_returns_integer_similarity() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::replying("```json\n{\"JD Match\": \"82%\"}\n```")),
            multipart_request("/api/v1/match", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"similarity": 82}));
    }

    #[tokio::test]
    async fn test_match_falls_back_to_string_similarity() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::replying(r#"{"JD Match": "roughly 70%"}"#)),
            multipart_request("/api/v1/match", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"similarity": "roughly 70%"}));
    }

    #[tokio::test]
    async fn test_match_missing_field_is_bad_request() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::replying(r#"{"Missing Keywords": ["SQL"]}"#)),
            multipart_request("/api/v1/match", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "AI response did not contain a valid 'JD Match' value"})
        );
    }

    #[tokio::test]
    async fn test_malformed_reply_includes_raw_response() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let prose = "Sure! Here's the analysis: ...";
        let (status, body) = send(
            app(FakeModelClient::replying(prose)),
            multipart_request("/api/v1/match/detailed", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["raw_response"], prose);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_detailed_array_reply_reports_fenced_raw_response() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let raw = "```json\n[\"Docker\", \"AWS\"]\n```";
        let (status, body) = send(
            app(FakeModelClient::replying(raw)),
            multipart_request("/api/v1/match/detailed", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["raw_response"], raw);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_internal_error() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::failing("quota exceeded")),
            multipart_request("/api/v1/match", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
        assert!(body.get("raw_response").is_none());
    }

    #[tokio::test]
    async fn test_detailed_returns_full_schema_with_defaults() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::replying(r#"{"JD Match": "60%"}"#)),
            multipart_request("/api/v1/match/detailed", Some(pdf.as_slice()), Some(JD)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "JD Match": "60%",
                "Missing Keywords": [],
                "Profile Summary": "N/A",
                "Strengths": "N/A",
                "Weaknesses": "N/A",
                "Recommend Courses & Resources": "N/A"
            })
        );
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected_before_model_call() {
        let llm = Arc::new(FakeModelClient::replying(r#"{"JD Match": "60%"}"#));
        let router = build_router(AppState {
            llm: llm.clone(),
            config: Config::for_tests(),
        });
        let (status, body) = send(router, multipart_request("/api/v1/match", None, Some(JD))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "resume file is required"}));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let pdf = pdf_with_pages(&["Go developer"]);
        let (status, body) = send(
            app(FakeModelClient::replying(r#"{"JD Match": "60%"}"#)),
            multipart_request("/api/v1/match", Some(pdf.as_slice()), Some("   ")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "job_description cannot be empty"}));
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_rejected_with_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(
            app(FakeModelClient::replying(r#"{"JD Match": "60%"}"#)),
            request,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
