//! Response Normalizer: the single defensive boundary between untrusted model
//! text and structured data.
//!
//! Exactly one cleanup heuristic is applied (markdown fence stripping), then the
//! text is parsed as strict JSON. Nothing else is repaired.

use serde_json::Value;

use crate::analysis::AnalysisFailure;
use crate::llm_client::RawModelReply;

/// Strips fences and parses the reply as JSON.
///
/// On failure returns `MalformedResponse` carrying the reply exactly as received.
pub fn normalize(reply: &RawModelReply) -> Result<Value, AnalysisFailure> {
    let raw = reply.as_str();
    serde_json::from_str(strip_json_fences(raw))
        .map_err(|_| AnalysisFailure::MalformedResponse(raw.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// The `json` tag matches in any case.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    let stripped = match stripped.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &stripped[4..],
        _ => stripped,
    };

    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}
