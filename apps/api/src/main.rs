mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod routes;
mod session;
mod state;
mod statement;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::statement::analyzer::GeminiAnalyzer;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting UniStatement API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.analysis_client_config())?;
    info!("LLM client initialized (model: {})", llm.model());
    // Not fatal: the form still loads and every analysis lands in the
    // error state until a key is configured.
    if !llm.has_api_key() {
        warn!("GEMINI_API_KEY is not set; analyses will fail");
    }

    let state = AppState::new(Arc::new(GeminiAnalyzer::new(llm)));
    state
        .sessions
        .spawn_sweeper(config.session_ttl, SESSION_SWEEP_INTERVAL);
    info!(
        "Session sweeper started (ttl: {}s)",
        config.session_ttl.num_seconds()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
