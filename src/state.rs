//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::ScheduleReader;
use crate::web::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub reader: ScheduleReader,
    pub sessions: SessionStore,
    /// Shared secret checked by the access gate.
    pub access_password: Arc<str>,
}

impl AppState {
    pub fn new(reader: ScheduleReader, access_password: impl Into<Arc<str>>) -> Self {
        Self {
            reader,
            sessions: SessionStore::new(),
            access_password: access_password.into(),
        }
    }

    /// Periodically drop sessions idle for longer than `ttl`.
    pub fn spawn_session_eviction(&self, ttl: Duration) -> tokio::task::JoinHandle<()> {
        let sessions = self.sessions.clone();
        let interval = (ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // skip the immediate first tick
            loop {
                ticker.tick().await;
                let evicted = sessions.evict_idle(ttl);
                if evicted > 0 {
                    tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
                }
            }
        })
    }
}
