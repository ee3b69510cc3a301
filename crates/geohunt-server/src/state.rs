//! Shared application state for the API server.
//!
//! [`AppState`] holds the repository store behind a trait object so the
//! same router runs against `PostgreSQL` in production and the in-memory
//! store in tests, plus the session settings every handler needs.

use std::sync::Arc;

use chrono::TimeDelta;
use geohunt_store::Store;

use crate::config::SessionSection;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The repository backend.
    pub store: Arc<dyn Store>,
    /// Name of the session cookie.
    pub cookie_name: String,
    /// How long a session stays valid after login.
    pub session_ttl: TimeDelta,
}

impl AppState {
    /// Build application state from a store and session settings.
    pub fn new(store: Arc<dyn Store>, session: &SessionSection) -> Self {
        Self {
            store,
            cookie_name: session.cookie_name.clone(),
            session_ttl: TimeDelta::hours(session.ttl_hours),
        }
    }
}
