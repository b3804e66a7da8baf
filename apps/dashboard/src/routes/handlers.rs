//! Axum handlers for the dashboard screens.
//!
//! Every handler drives the calling client's controller for its screen and
//! answers with that screen's rendered view. Validation feedback travels
//! inside the view; only malformed requests become HTTP errors.

use axum::{
    extract::{Multipart, Path, Query},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::session::{ClientSession, ScreenResponse};
use crate::errors::AppError;
use crate::models::upload::UploadFile;
use crate::render::{self, ScreenView};
use crate::workflow::jobs::JobForm;
use crate::workflow::screen::Phase;

/// Multipart field names accepted for resume uploads.
const UPLOAD_FIELDS: &[&str] = &["files", "file_upload"];

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MatchingQuery {
    pub job_name: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SelectJobRequest {
    pub job_name: String,
    pub page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessMatchingRequest {
    pub job_name: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /screens/current
///
/// Renders whatever screen is mounted without reloading it.
pub async fn handle_current(client: ClientSession) -> ScreenResponse {
    let active = match client.session.current() {
        Some(active) => active,
        None => {
            let controller = client.session.dashboard();
            controller.load().await;
            return client.respond(ScreenView::Dashboard(render::dashboard(&controller)));
        }
    };
    client.respond(render::screen(&active))
}

/// GET /screens/dashboard
pub async fn handle_dashboard(client: ClientSession) -> ScreenResponse {
    let controller = client.session.dashboard();
    controller.load().await;
    client.respond(ScreenView::Dashboard(render::dashboard(&controller)))
}

/// GET /screens/candidates?page=
pub async fn handle_candidates(
    client: ClientSession,
    Query(query): Query<PageQuery>,
) -> ScreenResponse {
    let controller = client.session.candidates();
    controller.load(query.page.unwrap_or(1)).await;
    client.respond(ScreenView::Candidates(render::candidates(&controller)))
}

/// POST /screens/candidates/upload
///
/// Multipart body with one part per resume under `files` (or `file_upload`).
pub async fn handle_upload(
    client: ClientSession,
    mut multipart: Multipart,
) -> Result<ScreenResponse, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if !UPLOAD_FIELDS.contains(&name.as_str()) {
            debug!(field = %name, "Ignoring multipart field");
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read '{file_name}': {e}")))?;
        files.push(UploadFile::new(file_name, content_type, bytes));
    }

    let controller = client.session.candidates();
    if matches!(controller.list(), Phase::Idle) {
        controller.load(1).await;
    }
    controller.upload(files).await;
    Ok(client.respond(ScreenView::Candidates(render::candidates(&controller))))
}

/// DELETE /screens/candidates/:id
pub async fn handle_delete_candidate(
    client: ClientSession,
    Path(id): Path<String>,
) -> ScreenResponse {
    let controller = client.session.candidates();
    controller.delete(&id).await;
    client.respond(ScreenView::Candidates(render::candidates(&controller)))
}

/// GET /screens/jobs?page=
pub async fn handle_jobs(client: ClientSession, Query(query): Query<PageQuery>) -> ScreenResponse {
    let controller = client.session.jobs();
    controller.load(query.page.unwrap_or(1)).await;
    client.respond(ScreenView::Jobs(render::jobs(&controller)))
}

/// POST /screens/jobs
pub async fn handle_create_job(client: ClientSession, Json(form): Json<JobForm>) -> ScreenResponse {
    let controller = client.session.jobs();
    controller.create(form).await;
    client.respond(ScreenView::Jobs(render::jobs(&controller)))
}

/// DELETE /screens/jobs/:id
pub async fn handle_delete_job(client: ClientSession, Path(id): Path<String>) -> ScreenResponse {
    let controller = client.session.jobs();
    controller.delete(&id).await;
    client.respond(ScreenView::Jobs(render::jobs(&controller)))
}

/// GET /screens/matching?job_name=&page=
///
/// Mounts a fresh matching screen, loads the job selector and, when a job is
/// given, selects it.
pub async fn handle_matching(
    client: ClientSession,
    Query(query): Query<MatchingQuery>,
) -> ScreenResponse {
    let controller = client.session.open_matching();
    controller.load().await;
    if let Some(job_name) = query.job_name.as_deref() {
        controller.select(job_name, query.page.unwrap_or(1)).await;
    }
    client.respond(ScreenView::Matching(render::matching(&controller)))
}

/// POST /screens/matching/select
pub async fn handle_select_job(
    client: ClientSession,
    Json(request): Json<SelectJobRequest>,
) -> ScreenResponse {
    let controller = client.session.matching();
    if matches!(controller.jobs(), Phase::Idle) {
        controller.load().await;
    }
    controller
        .select(&request.job_name, request.page.unwrap_or(1))
        .await;
    client.respond(ScreenView::Matching(render::matching(&controller)))
}

/// POST /screens/matching/process
///
/// Runs a match pass for `job_name`, or for the selected job when omitted.
/// Blocks until the pass and the follow-up results fetch are done.
pub async fn handle_process_matching(
    client: ClientSession,
    body: Option<Json<ProcessMatchingRequest>>,
) -> ScreenResponse {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let controller = client.session.matching();
    if matches!(controller.jobs(), Phase::Idle) {
        controller.load().await;
    }
    controller.trigger(request.job_name.as_deref()).await;
    client.respond(ScreenView::Matching(render::matching(&controller)))
}

/// GET /screens/matching/detail/:candidate_id
///
/// Opens the score breakdown of one candidate against the selected job.
pub async fn handle_matching_detail(
    client: ClientSession,
    Path(candidate_id): Path<String>,
) -> ScreenResponse {
    let controller = client.session.matching();
    if matches!(controller.jobs(), Phase::Idle) {
        controller.load().await;
    }
    controller.show_detail(&candidate_id).await;
    client.respond(ScreenView::Matching(render::matching(&controller)))
}
