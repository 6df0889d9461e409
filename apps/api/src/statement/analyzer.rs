//! Statement analyzer: one provider round trip per call, strictly typed result.
//!
//! Pluggable via the `StatementAnalyzer` trait. `AppState` holds an
//! `Arc<dyn StatementAnalyzer>`; the default is `GeminiAnalyzer`.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::models::analysis::{AnalysisResult, PlagiarismCheck, RiskStatus};
use crate::statement::request::build_analysis_request;
use crate::statement::validation::ValidatedInput;

/// The only failure text a user ever sees, whatever went wrong underneath.
pub const ANALYSIS_FAILED_MESSAGE: &str = "We encountered an issue analyzing your statement. \
    Please try again or check your internet connection.";

const MAX_SCORE: i64 = 100;

/// Every way a round trip can fail. Kept distinct for logs; callers that face
/// the user show `ANALYSIS_FAILED_MESSAGE` for all of them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("provider response is not valid JSON for the schema: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("provider response does not match the schema: {0}")]
    SchemaMismatch(String),
}

impl AnalysisError {
    /// Short machine-readable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Provider(LlmError::MissingApiKey) => "missing_api_key",
            AnalysisError::Provider(LlmError::Http(_)) => "transport",
            AnalysisError::Provider(LlmError::Api { .. }) => "provider_status",
            AnalysisError::Provider(LlmError::EmptyContent) => "empty_response",
            AnalysisError::Malformed(_) => "malformed_json",
            AnalysisError::SchemaMismatch(_) => "schema_mismatch",
        }
    }
}

#[async_trait]
pub trait StatementAnalyzer: Send + Sync {
    async fn analyze(&self, input: &ValidatedInput) -> Result<AnalysisResult, AnalysisError>;
}

/// Provider-backed analyzer. Never retries; a failure is returned as-is.
pub struct GeminiAnalyzer {
    llm: LlmClient,
}

impl GeminiAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl StatementAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, input: &ValidatedInput) -> Result<AnalysisResult, AnalysisError> {
        let request = build_analysis_request(input);
        debug!(
            "Requesting analysis: subject={:?}, chars={}, lines={}",
            input.input().subject.trim(),
            input.metrics().char_count,
            input.metrics().line_count
        );

        let text = self
            .llm
            .generate_structured(&request.prompt, &request.response_schema)
            .await?;

        parse_analysis(&text).inspect_err(|e| warn!("Rejected provider payload: {e}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire parsing
// ────────────────────────────────────────────────────────────────────────────

/// Wire shape of the provider payload. Integers and the status label are kept
/// loose here so range and label violations surface as `SchemaMismatch`
/// rather than as JSON errors.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireAnalysis {
    score: i64,
    summary: String,
    structure_feedback: String,
    content_feedback: String,
    style_tone_feedback: String,
    plagiarism_check: WirePlagiarismCheck,
    key_strengths: Vec<String>,
    key_improvements: Vec<String>,
    actionable_tips: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WirePlagiarismCheck {
    risk_score: i64,
    status: String,
    feedback: String,
}

/// Parses provider text into an `AnalysisResult`. Values are checked, never
/// clamped or rewritten: what is returned is exactly what the provider sent.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let wire: WireAnalysis = serde_json::from_str(strip_json_fences(text))?;
    wire.try_into()
}

fn percent(field: &str, value: i64) -> Result<u32, AnalysisError> {
    if (0..=MAX_SCORE).contains(&value) {
        Ok(value as u32)
    } else {
        Err(AnalysisError::SchemaMismatch(format!(
            "{field} must be between 0 and {MAX_SCORE}, got {value}"
        )))
    }
}

impl TryFrom<WireAnalysis> for AnalysisResult {
    type Error = AnalysisError;

    fn try_from(wire: WireAnalysis) -> Result<Self, Self::Error> {
        let check = wire.plagiarism_check;
        let status = RiskStatus::from_label(&check.status).ok_or_else(|| {
            AnalysisError::SchemaMismatch(format!(
                "plagiarism_check.status must be one of 'Low Risk', 'Moderate Risk', 'High Risk', got {:?}",
                check.status
            ))
        })?;

        Ok(AnalysisResult {
            score: percent("score", wire.score)?,
            summary: wire.summary,
            structure_feedback: wire.structure_feedback,
            content_feedback: wire.content_feedback,
            style_tone_feedback: wire.style_tone_feedback,
            plagiarism_check: PlagiarismCheck {
                risk_score: percent("plagiarism_check.risk_score", check.risk_score)?,
                status,
                feedback: check.feedback,
            },
            key_strengths: wire.key_strengths,
            key_improvements: wire.key_improvements,
            actionable_tips: wire.actionable_tips,
        })
    }
}
