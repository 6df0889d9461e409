use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::session::controller::{SessionState, SharedSession, StatementSession};

/// In-memory table of live sessions. Nothing here is ever written to disk.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    /// Creates a new idle session and returns its id.
    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(StatementSession::new(id)));
        self.sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session untouched for longer than `ttl`.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        self.sweep_before(Utc::now() - ttl).await
    }

    /// Drops sessions last touched before `cutoff`. Sessions still analyzing,
    /// or locked by a request right now, are kept for the next sweep.
    pub async fn sweep_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.state() == SessionState::Analyzing || s.touched_at() >= cutoff,
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Runs `sweep` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, ttl: Duration, every: std::time::Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = registry.sweep(ttl).await;
                if evicted > 0 {
                    info!(evicted, "Expired sessions evicted");
                }
            }
        })
    }
}
