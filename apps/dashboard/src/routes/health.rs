use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version, the backend it talks to and
/// the number of open client sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "recruiter-dashboard",
        "backend_url": state.config.backend_url,
        "open_sessions": state.sessions.open_count(),
    }))
}
