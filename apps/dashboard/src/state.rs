use std::sync::Arc;

use crate::config::Config;
use crate::workflow::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Per-client dashboard sessions; each owns its mounted screen.
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
