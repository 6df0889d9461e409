use std::sync::Arc;

use crate::session::SessionRegistry;
use crate::statement::analyzer::StatementAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn StatementAnalyzer>,
    /// Live sessions, in memory only.
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn StatementAnalyzer>) -> Self {
        Self {
            analyzer,
            sessions: SessionRegistry::default(),
        }
    }
}
