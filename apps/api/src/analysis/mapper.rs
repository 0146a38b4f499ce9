//! Result Mapper: validates a parsed reply against the shape its mode asked for.
//!
//! Summary mode is strict on its one field. Detailed mode only requires an object
//! and fills absent fields with defaults ("N/A", or an empty keyword list).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::prompts::{
    JD_MATCH, MISSING_KEYWORDS, PROFILE_SUMMARY, RECOMMENDED_RESOURCES, STRENGTHS, WEAKNESSES,
};
use crate::analysis::{AnalysisFailure, AnalysisMode};

const NOT_AVAILABLE: &str = "N/A";

/// Numeric view of a match percentage. Falls back to the original string when the
/// value is not an integer percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MatchScore {
    Percent(i64),
    Text(String),
}

impl MatchScore {
    pub fn parse(match_percentage: &str) -> Self {
        let trimmed = match_percentage.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        number
            .parse::<i64>()
            .map(MatchScore::Percent)
            .unwrap_or_else(|_| MatchScore::Text(match_percentage.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    #[serde(rename = "JD Match")]
    pub match_percentage: String,
}

impl SummaryResult {
    pub fn score(&self) -> MatchScore {
        MatchScore::parse(&self.match_percentage)
    }
}

/// Full feedback report. Serializes with the exact keys of the detailed schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedReport {
    #[serde(rename = "JD Match")]
    pub match_percentage: String,
    #[serde(rename = "Missing Keywords")]
    pub missing_keywords: Vec<String>,
    #[serde(rename = "Profile Summary")]
    pub profile_summary: String,
    #[serde(rename = "Strengths")]
    pub strengths: String,
    #[serde(rename = "Weaknesses")]
    pub weaknesses: String,
    #[serde(rename = "Recommend Courses & Resources")]
    pub recommended_resources: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Summary(SummaryResult),
    Detailed(DetailedReport),
}

impl AnalysisResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisResult::Summary(_) => AnalysisMode::Summary,
            AnalysisResult::Detailed(_) => AnalysisMode::Detailed,
        }
    }

    pub fn into_summary(self) -> Option<SummaryResult> {
        match self {
            AnalysisResult::Summary(s) => Some(s),
            AnalysisResult::Detailed(_) => None,
        }
    }

    pub fn into_detailed(self) -> Option<DetailedReport> {
        match self {
            AnalysisResult::Detailed(d) => Some(d),
            AnalysisResult::Summary(_) => None,
        }
    }

    pub fn match_percentage(&self) -> &str {
        match self {
            AnalysisResult::Summary(s) => &s.match_percentage,
            AnalysisResult::Detailed(d) => &d.match_percentage,
        }
    }
}

/// Maps a parsed reply to the result shape of `mode`. Pure: same input, same output.
///
/// A `MalformedResponse` from here carries the re-serialized value; the pipeline
/// replaces it with the reply text as received.
pub fn map_result(mode: AnalysisMode, parsed: &Value) -> Result<AnalysisResult, AnalysisFailure> {
    match mode {
        AnalysisMode::Summary => map_summary(parsed).map(AnalysisResult::Summary),
        AnalysisMode::Detailed => map_detailed(parsed).map(AnalysisResult::Detailed),
    }
}

fn map_summary(parsed: &Value) -> Result<SummaryResult, AnalysisFailure> {
    let match_percentage = match parsed.get(JD_MATCH) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(AnalysisFailure::MissingField(JD_MATCH.to_string())),
    };
    Ok(SummaryResult { match_percentage })
}

fn map_detailed(parsed: &Value) -> Result<DetailedReport, AnalysisFailure> {
    let obj = parsed
        .as_object()
        .ok_or_else(|| AnalysisFailure::MalformedResponse(parsed.to_string()))?;

    Ok(DetailedReport {
        match_percentage: scalar_field(obj, JD_MATCH),
        missing_keywords: keyword_list(obj.get(MISSING_KEYWORDS)),
        profile_summary: scalar_field(obj, PROFILE_SUMMARY),
        strengths: scalar_field(obj, STRENGTHS),
        weaknesses: scalar_field(obj, WEAKNESSES),
        recommended_resources: scalar_field(obj, RECOMMENDED_RESOURCES),
    })
}

fn scalar_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn keyword_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
