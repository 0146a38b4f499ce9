// All LLM prompt templates for resume analysis.
// The field names below are the single source for both the schema embedded in the
// prompt and the keys the mapper reads back.

use crate::analysis::AnalysisMode;

pub const JD_MATCH: &str = "JD Match";
pub const MISSING_KEYWORDS: &str = "Missing Keywords";
pub const PROFILE_SUMMARY: &str = "Profile Summary";
pub const STRENGTHS: &str = "Strengths";
pub const WEAKNESSES: &str = "Weaknesses";
pub const RECOMMENDED_RESOURCES: &str = "Recommend Courses & Resources";

const SUMMARY_INSTRUCTION: &str = "Act as a professional ATS (Applicant Tracking System). \
    Analyze the resume against the job description and provide ONLY a JSON response.";

const DETAILED_INSTRUCTION: &str = "Act as a highly skilled ATS (Applicant Tracking System). \
    Analyze the resume against the job description and return a detailed analysis in JSON format.";

const JSON_ONLY_RULES: &str = "Return ONLY the JSON object. \
    Do NOT include explanations, commentary, or any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Builds the prompt for `mode`. Both inputs are embedded verbatim.
pub fn build_prompt(mode: AnalysisMode, resume_text: &str, job_description: &str) -> String {
    let (instruction, schema) = match mode {
        AnalysisMode::Summary => (SUMMARY_INSTRUCTION, summary_schema()),
        AnalysisMode::Detailed => (DETAILED_INSTRUCTION, detailed_schema()),
    };

    format!(
        "{instruction}\n\n\
         Resume: {resume_text}\n\
         Job Description: {job_description}\n\n\
         Return valid JSON with this EXACT schema (no extra fields):\n\
         {schema}\n\n\
         {JSON_ONLY_RULES}"
    )
}

fn summary_schema() -> String {
    format!("{{\n  \"{JD_MATCH}\": \"XX%\"\n}}")
}

fn detailed_schema() -> String {
    format!(
        "{{\n  \
           \"{JD_MATCH}\": \"XX%\",\n  \
           \"{MISSING_KEYWORDS}\": [\"keyword1\", \"keyword2\"],\n  \
           \"{PROFILE_SUMMARY}\": \"Summarized analysis of the resume...\",\n  \
           \"{STRENGTHS}\": \"Key strengths of the candidate...\",\n  \
           \"{WEAKNESSES}\": \"Areas where the resume could be improved...\",\n  \
           \"{RECOMMENDED_RESOURCES}\": \"Suggested courses and materials...\"\n\
         }}"
    )
}
