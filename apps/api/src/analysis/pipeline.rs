//! The analysis pipeline shared by every front end.
//!
//! Extract → Build → Send → Normalize → Map, once, with no retries. The first
//! failing stage short-circuits to a terminal `AnalysisFailure`.

use std::time::Duration;

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::analysis::extractor::extract_text_blocking;
use crate::analysis::mapper::{map_result, AnalysisResult};
use crate::analysis::normalizer::normalize;
use crate::analysis::prompts::build_prompt;
use crate::analysis::{AnalysisFailure, AnalysisMode};
use crate::llm_client::{LlmError, ModelClient, ModelRequest};

/// Runs the full pipeline on an uploaded resume document.
pub async fn analyze(
    llm: &dyn ModelClient,
    model_timeout: Duration,
    mode: AnalysisMode,
    document: Bytes,
    job_description: &str,
) -> Result<AnalysisResult, AnalysisFailure> {
    let document_len = document.len();
    let resume_text = extract_text_blocking(document).await;
    info!(
        mode = mode.as_str(),
        document_bytes = document_len,
        resume_chars = resume_text.len(),
        "Resume text extracted"
    );

    analyze_text(llm, model_timeout, mode, &resume_text, job_description).await
}

/// Runs the pipeline from already-extracted resume text.
pub async fn analyze_text(
    llm: &dyn ModelClient,
    model_timeout: Duration,
    mode: AnalysisMode,
    resume_text: &str,
    job_description: &str,
) -> Result<AnalysisResult, AnalysisFailure> {
    let request = ModelRequest::new(build_prompt(mode, resume_text, job_description));
    info!(
        mode = mode.as_str(),
        prompt_chars = request.prompt().len(),
        "Sending analysis prompt"
    );

    let outcome = run_model_stages(llm, model_timeout, mode, &request).await;
    match &outcome {
        Ok(result) => info!(
            mode = result.mode().as_str(),
            match_percentage = result.match_percentage(),
            "Analysis completed"
        ),
        Err(AnalysisFailure::UpstreamError(message)) => {
            error!(mode = mode.as_str(), "Model call failed: {message}")
        }
        Err(failure) => warn!(
            mode = mode.as_str(),
            raw_response = failure.raw_text().unwrap_or_default(),
            "Analysis rejected: {failure}"
        ),
    }
    outcome
}

async fn run_model_stages(
    llm: &dyn ModelClient,
    model_timeout: Duration,
    mode: AnalysisMode,
    request: &ModelRequest,
) -> Result<AnalysisResult, AnalysisFailure> {
    let reply = tokio::time::timeout(model_timeout, llm.send(request))
        .await
        .map_err(|_| LlmError::Timeout(model_timeout.as_secs()))??;

    let parsed = normalize(&reply)?;
    map_result(mode, &parsed).map_err(|failure| match failure {
        AnalysisFailure::MalformedResponse(_) => {
            AnalysisFailure::MalformedResponse(reply.as_str().to_string())
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractor::fixtures::pdf_with_pages;
    use crate::analysis::mapper::{DetailedReport, MatchScore};
    use crate::llm_client::fake::FakeModelClient;

    const TIMEOUT: Duration = Duration::from_secs(30);
    const JD: &str = "Backend engineer. Required: Go, Docker, AWS.";

    #[tokio::test]
    async fn test_scenario_a_fenced_summary_reply() {
        let llm = FakeModelClient::replying("```json\n{\"JD Match\": \"82%\"}\n```");
        let result = analyze_text(&llm, TIMEOUT, AnalysisMode::Summary, "Go developer", JD)
            .await
            .unwrap();
        let AnalysisResult::Summary(summary) = result else {
            panic!("expected summary result");
        };
        assert_eq!(summary.match_percentage, "82%");
        assert_eq!(summary.score(), MatchScore::Percent(82));
    }

    #[tokio::test]
    async fn test_scenario_b_detailed_reply() {
        let llm = FakeModelClient::replying(
            r#"{"JD Match": "70%", "Missing Keywords": ["Docker"], "Profile Summary": "Solid backend experience.", "Strengths": "Strong Go skills.", "Weaknesses": "No cloud certs.", "Recommend Courses & Resources": "AWS fundamentals"}"#,
        );
        let result = analyze_text(&llm, TIMEOUT, AnalysisMode::Detailed, "Go developer", JD)
            .await
            .unwrap();
        assert_eq!(
            result,
            AnalysisResult::Detailed(DetailedReport {
                match_percentage: "70%".to_string(),
                missing_keywords: vec!["Docker".to_string()],
                profile_summary: "Solid backend experience.".to_string(),
                strengths: "Strong Go skills.".to_string(),
                weaknesses: "No cloud certs.".to_string(),
                recommended_resources: "AWS fundamentals".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_scenario_c_prose_reply_is_malformed() {
        let prose = "Sure! Here's the analysis: ...";
        let llm = FakeModelClient::replying(prose);
        let err = analyze_text(&llm, TIMEOUT, AnalysisMode::Summary, "resume", JD)
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisFailure::MalformedResponse(prose.to_string()));
    }

    #[tokio::test]
    async fn test_detailed_non_object_reply_carries_verbatim_text() {
        let raw = "```json\n[\"Docker\", \"AWS\"]\n```";
        let llm = FakeModelClient::replying(raw);
        let err = analyze_text(&llm, TIMEOUT, AnalysisMode::Detailed, "resume", JD)
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisFailure::MalformedResponse(raw.to_string()));
    }

    #[tokio::test]
    async fn test_scenario_d_summary_missing_jd_match() {
        let llm = FakeModelClient::replying(r#"{"Missing Keywords": ["SQL"]}"#);
        let err = analyze_text(&llm, TIMEOUT, AnalysisMode::Summary, "resume", JD)
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisFailure::MissingField("JD Match".to_string()));
    }

    #[tokio::test]
    async fn test_scenario_e_partial_detailed_reply() {
        let llm = FakeModelClient::replying(r#"{"JD Match": "60%"}"#);
        let result = analyze_text(&llm, TIMEOUT, AnalysisMode::Detailed, "resume", JD)
            .await
            .unwrap();
        let AnalysisResult::Detailed(report) = result else {
            panic!("expected detailed result");
        };
        assert_eq!(report.profile_summary, "N/A");
        assert!(report.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported_once() {
        let llm = FakeModelClient::failing("quota exceeded");
        let err = analyze_text(&llm, TIMEOUT, AnalysisMode::Summary, "resume", JD)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisFailure::UpstreamError(ref m) if m.contains("quota exceeded")));
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_call_times_out_as_upstream_error() {
        let llm = FakeModelClient::replying(r#"{"JD Match": "90%"}"#)
            .with_delay(Duration::from_secs(120));
        let err = analyze_text(
            &llm,
            Duration::from_secs(5),
            AnalysisMode::Summary,
            "resume",
            JD,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisFailure::UpstreamError("model call timed out after 5s".to_string())
        );
    }

    #[tokio::test]
    async fn test_request_uses_mode_prompt_and_fixed_temperature() {
        let llm = FakeModelClient::replying(r#"{"JD Match": "50%"}"#);
        analyze_text(&llm, TIMEOUT, AnalysisMode::Detailed, "Rust, Tokio", JD)
            .await
            .unwrap();
        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].prompt(),
            build_prompt(AnalysisMode::Detailed, "Rust, Tokio", JD)
        );
        assert!((requests[0].temperature() - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_unreadable_document_still_reaches_the_model() {
        let llm = FakeModelClient::replying(r#"{"JD Match": "5%"}"#);
        let result = analyze(
            &llm,
            TIMEOUT,
            AnalysisMode::Summary,
            Bytes::from_static(b"not a pdf"),
            JD,
        )
        .await
        .unwrap();
        assert_eq!(result.match_percentage(), "5%");
        assert!(llm.requests()[0].prompt().contains("Resume: \n"));
    }

    #[tokio::test]
    async fn test_zero_page_document_proceeds_with_empty_text() {
        let llm = FakeModelClient::replying(r#"{"JD Match": "0%"}"#);
        let result = analyze(
            &llm,
            TIMEOUT,
            AnalysisMode::Summary,
            Bytes::from(pdf_with_pages(&[])),
            JD,
        )
        .await;
        assert!(result.is_ok());
    }
}
