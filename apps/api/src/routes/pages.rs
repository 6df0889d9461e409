//! Server-rendered pages: the form, the analyzing view, the report, and the
//! failure view, all driven by the session state machine.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::analysis::UserInput;
use crate::render::build_report;
use crate::render::html::{render_error_page, render_form_page, render_report_page, FormView};
use crate::session::controller::{start_analysis, Phase};
use crate::state::AppState;
use crate::statement::validation::{normalize_newlines, validate_submission};

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub statement: String,
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render_form_page(&FormView::default()))
}

/// POST /analyze
///
/// A rejected submission re-renders the form with the message and the values
/// the student typed; nothing is sent to the provider.
pub async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let input = UserInput {
        subject: form.subject,
        university: Some(form.university),
        statement: normalize_newlines(&form.statement),
    };

    let validated = match validate_submission(input.clone()) {
        Ok(v) => v,
        Err(e) => {
            let message = e.to_string();
            return Html(render_form_page(&FormView {
                subject: &input.subject,
                university: input.university.as_deref().unwrap_or_default(),
                statement: &input.statement,
                error: Some(&message),
                analyzing: false,
            }))
            .into_response();
        }
    };

    let (id, session) = state.sessions.create().await;
    match start_analysis(session, state.analyzer.clone(), validated).await {
        Ok(_) => Redirect::to(&format!("/sessions/{id}")).into_response(),
        // A fresh session is always idle, so this is not expected.
        Err(e) => {
            warn!("Could not start analysis for new session {id}: {e}");
            Redirect::to("/").into_response()
        }
    }
}

/// GET /sessions/:id
pub async fn show_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(session) = state.sessions.get(id).await else {
        return Redirect::to("/").into_response();
    };
    let phase = session.lock().await.phase().clone();

    let page = match phase {
        Phase::Idle => render_form_page(&FormView::default()),
        Phase::Analyzing { .. } => render_form_page(&FormView {
            analyzing: true,
            ..FormView::default()
        }),
        Phase::Results { result, .. } => render_report_page(&build_report(&result), id),
        Phase::Error { message, .. } => render_error_page(&message, id),
    };
    Html(page).into_response()
}

/// POST /sessions/:id/reset
///
/// Start over / try again. The session is dropped once it is back to idle.
pub async fn reset_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Redirect {
    let Some(session) = state.sessions.get(id).await else {
        return Redirect::to("/");
    };
    let reset = session.lock().await.reset();
    match reset {
        Ok(()) => {
            state.sessions.remove(id).await;
            Redirect::to("/")
        }
        // Still analyzing: there is no cancel, go back and keep waiting.
        Err(_) => Redirect::to(&format!("/sessions/{id}")),
    }
}
