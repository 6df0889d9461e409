use anyhow::{Context, Result};
use chrono::Duration;

use crate::llm_client::{AnalysisClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_SESSION_TTL_SECS: u32 = 30 * 60;

/// Application configuration loaded from environment variables.
/// The provider API key is optional here; its absence is reported at startup
/// and every analysis then fails fast.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Idle, finished, or failed sessions older than this are evicted.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl: Duration::seconds(
                std::env::var("SESSION_TTL_SECS")
                    .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
                    .parse::<u32>()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?
                    .into(),
            ),
        })
    }

    /// Builds the explicit client configuration handed to the analysis client.
    pub fn analysis_client_config(&self) -> AnalysisClientConfig {
        AnalysisClientConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
        }
    }
}

/// Reads a variable, treating unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
