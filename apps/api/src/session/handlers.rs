//! Axum route handlers for the session JSON API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, UserInput};
use crate::render::{build_report, ReportView};
use crate::session::controller::{start_analysis, SessionState, SharedSession, StatementSession};
use crate::state::AppState;
use crate::statement::validation::validate_submission;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&StatementSession> for SessionResponse {
    fn from(session: &StatementSession) -> Self {
        let result = session.result().map(|r| r.as_ref().clone());
        Self {
            session_id: session.id(),
            state: session.state(),
            since: session.phase().since(),
            report: result.as_ref().map(build_report),
            result,
            error_message: session.error_message().map(str::to_string),
        }
    }
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Creates a new idle session.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (_, session) = state.sessions.create().await;
    let response = SessionResponse::from(&*session.lock().await);
    (StatusCode::CREATED, Json(response))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let response = SessionResponse::from(&*session.lock().await);
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/submit
///
/// Validates the input, then moves the session to `analyzing` and runs the
/// analysis in the background. Poll the session for the outcome.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = find_session(&state, id).await?;
    let validated = validate_submission(input)?;

    start_analysis(session.clone(), state.analyzer.clone(), validated).await?;

    let response = SessionResponse::from(&*session.lock().await);
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.reset()?;
    Ok(Json(SessionResponse::from(&*guard)))
}

/// DELETE /api/v1/sessions/:id
///
/// Drops the session and anything it holds. An analysis still in flight runs
/// to completion against its own handle and is then discarded.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}
