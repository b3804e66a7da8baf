pub mod handlers;
pub mod health;
pub mod session;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/screens/current", get(handlers::handle_current))
        .route("/screens/dashboard", get(handlers::handle_dashboard))
        // Candidates
        .route("/screens/candidates", get(handlers::handle_candidates))
        .route("/screens/candidates/upload", post(handlers::handle_upload))
        .route(
            "/screens/candidates/:id",
            delete(handlers::handle_delete_candidate),
        )
        // Jobs
        .route(
            "/screens/jobs",
            get(handlers::handle_jobs).post(handlers::handle_create_job),
        )
        .route("/screens/jobs/:id", delete(handlers::handle_delete_job))
        // Matching
        .route("/screens/matching", get(handlers::handle_matching))
        .route(
            "/screens/matching/select",
            post(handlers::handle_select_job),
        )
        .route(
            "/screens/matching/process",
            post(handlers::handle_process_matching),
        )
        .route(
            "/screens/matching/detail/:candidate_id",
            get(handlers::handle_matching_detail),
        )
        .with_state(state)
}
