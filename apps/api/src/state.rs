use crate::coach::fallback::FallbackEngine;
use crate::config::Config;
use crate::session::{Session, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Stateless; every request walks the full model priority list.
    pub engine: FallbackEngine,
    pub config: Config,
}

impl AppState {
    /// Deployment key first, then whatever the user entered for this session.
    pub fn credential_for(&self, session: &Session) -> Option<String> {
        self.config
            .google_api_key
            .clone()
            .or_else(|| session.credential().map(str::to_string))
    }
}
