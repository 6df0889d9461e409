//! Analysis Request Builder: pairs the tutor prompt with the fixed response schema.
//!
//! Pure data: no I/O, deterministic for identical input.

use serde_json::{json, Value};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::statement::prompts::*;
use crate::statement::validation::{ValidatedInput, MAX_CHARS, MAX_LINES};

/// Top-level fields the provider must return, in schema order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "score",
    "summary",
    "structure_feedback",
    "content_feedback",
    "style_tone_feedback",
    "plagiarism_check",
    "key_strengths",
    "key_improvements",
    "actionable_tips",
];

pub const PLAGIARISM_REQUIRED_FIELDS: [&str; 3] = ["risk_score", "status", "feedback"];

/// One outbound evaluation: instruction text plus the structured-output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub response_schema: Value,
}

pub fn build_analysis_request(validated: &ValidatedInput) -> AnalysisRequest {
    let input = validated.input();
    let university_clause = input
        .university()
        .map(|u| format!(" at {u}"))
        .unwrap_or_default();
    let max_chars = MAX_CHARS.to_string();
    let max_lines = MAX_LINES.to_string();

    let prompt = fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("subject", input.subject.trim()),
            ("university_clause", &university_clause),
            ("max_chars", &max_chars),
            ("max_lines", &max_lines),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
            ("statement", &input.statement),
        ],
    );

    AnalysisRequest {
        prompt,
        response_schema: response_schema(),
    }
}

/// Structured-output schema in the provider's OpenAPI subset (upper-case type names).
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": SCORE_DESCRIPTION },
            "summary": { "type": "STRING", "description": SUMMARY_DESCRIPTION },
            "structure_feedback": { "type": "STRING", "description": STRUCTURE_DESCRIPTION },
            "content_feedback": { "type": "STRING", "description": CONTENT_DESCRIPTION },
            "style_tone_feedback": { "type": "STRING", "description": STYLE_DESCRIPTION },
            "plagiarism_check": {
                "type": "OBJECT",
                "properties": {
                    "risk_score": { "type": "INTEGER", "description": RISK_SCORE_DESCRIPTION },
                    "status": {
                        "type": "STRING",
                        "enum": ["Low Risk", "Moderate Risk", "High Risk"],
                        "description": STATUS_DESCRIPTION
                    },
                    "feedback": { "type": "STRING", "description": ORIGINALITY_FEEDBACK_DESCRIPTION }
                },
                "required": PLAGIARISM_REQUIRED_FIELDS
            },
            "key_strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": STRENGTHS_DESCRIPTION
            },
            "key_improvements": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": IMPROVEMENTS_DESCRIPTION
            },
            "actionable_tips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": TIPS_DESCRIPTION
            }
        },
        "required": REQUIRED_FIELDS
    })
}

/// Substitutes `{key}` placeholders in a single pass, so user text that happens
/// to contain a placeholder name is never expanded.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
