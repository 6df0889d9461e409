pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;
use crate::statement::handlers::handle_check;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML surface
        .route("/", get(pages::index))
        .route("/analyze", post(pages::analyze))
        .route("/sessions/:id", get(pages::show_session))
        .route("/sessions/:id/reset", post(pages::reset_session))
        // Statement API
        .route("/api/v1/statements/check", post(handle_check))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/submit", post(handlers::handle_submit))
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        .with_state(state)
}
