//! Axum route handlers for stateless statement checks.

use axum::Json;
use serde::Serialize;

use crate::models::analysis::UserInput;
use crate::statement::validation::{validate_submission, StatementMetrics};

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metrics: StatementMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// POST /api/v1/statements/check
///
/// Runs the validator and the advisory length counter. Never calls the provider.
pub async fn handle_check(Json(input): Json<UserInput>) -> Json<CheckResponse> {
    let metrics = StatementMetrics::measure(&input.statement);
    let outcome = validate_submission(input);

    Json(CheckResponse {
        accepted: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
        metrics,
        warning: metrics.warning(),
    })
}
