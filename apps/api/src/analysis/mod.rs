// Resume analysis core.
// One linear pipeline per request: extract → build prompt → send → normalize → map.
// All model calls go through llm_client: no direct provider calls here.

pub mod extractor;
pub mod handlers;
pub mod mapper;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Selects the prompt template and the reply shape the mapper will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Summary,
    Detailed,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Summary => "summary",
            AnalysisMode::Detailed => "detailed",
        }
    }
}

/// Terminal failure of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisFailure {
    /// Reply was not valid JSON after fence-stripping, or had the wrong structure.
    /// Carries the original reply text.
    #[error("AI response did not return a valid JSON object")]
    MalformedResponse(String),

    #[error("AI response did not contain a valid '{0}' value")]
    MissingField(String),

    #[error("Model provider error: {0}")]
    UpstreamError(String),
}

impl AnalysisFailure {
    /// Upstream text worth showing for diagnosis, if any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            AnalysisFailure::MalformedResponse(raw) => Some(raw),
            _ => None,
        }
    }
}

impl From<LlmError> for AnalysisFailure {
    fn from(err: LlmError) -> Self {
        AnalysisFailure::UpstreamError(err.to_string())
    }
}
