//! Backend client: the single point of entry for every call to the recruitment backend.
//!
//! No other module builds URLs or touches `reqwest` directly. Coordinators hold an
//! `Arc<dyn RecruitmentBackend>` so tests can swap in the in-memory backend.
//!
//! Calls are never retried here: every retry in the dashboard is a user action.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::{Candidate, CandidateListResponse};
use crate::models::job::{Job, JobListPayload, NewJob};
use crate::models::matching::{
    MatchDetail, MatchResult, MatchResultsResponse, MatchRunSummary, ProcessMatchingRequest,
};
use crate::models::upload::{UploadFile, UploadResponse};
use crate::models::Page;

#[cfg(test)]
pub mod fake;

/// Multipart field the backend reads uploaded resumes from.
pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Contract of the recruitment backend (candidates, jobs, matching).
#[async_trait]
pub trait RecruitmentBackend: Send + Sync {
    async fn list_candidates(&self, page: u32, page_size: u32)
        -> Result<Page<Candidate>, BackendError>;

    async fn upload_candidates(&self, files: Vec<UploadFile>)
        -> Result<UploadResponse, BackendError>;

    async fn delete_candidate(&self, id: &str) -> Result<(), BackendError>;

    async fn list_jobs(&self, page: u32, page_size: u32) -> Result<Page<Job>, BackendError>;

    /// Flat list used to fill job selectors.
    async fn list_all_jobs(&self) -> Result<Vec<Job>, BackendError>;

    async fn create_job(&self, job: &NewJob) -> Result<Job, BackendError>;

    async fn delete_job(&self, id: &str) -> Result<(), BackendError>;

    /// Runs one scoring pass for every candidate against `job_name`.
    async fn process_matching(&self, job_name: &str) -> Result<MatchRunSummary, BackendError>;

    async fn matching_results(
        &self,
        job_name: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MatchResult>, BackendError>;

    /// Score breakdown of one candidate against one job. The backend answers
    /// with a "Not analyzed" placeholder when no pass has scored the pair.
    async fn matching_detail(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchDetail, BackendError>;
}

/// `reqwest`-backed implementation talking JSON (and multipart for uploads).
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecruitmentBackend for HttpBackend {
    async fn list_candidates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Candidate>, BackendError> {
        let response = self
            .client
            .get(self.url("/candidates"))
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        let body: CandidateListResponse = read_json(response).await?;
        Ok(Page {
            items: body.results,
            page,
            page_size,
            total_items: body.total_file,
            total_pages: body.total_page,
        })
    }

    async fn upload_candidates(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<UploadResponse, BackendError> {
        let mut form = multipart::Form::new();
        for file in files {
            let mut part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
            if let Some(content_type) = file.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part(UPLOAD_FIELD, part);
        }

        let response = self
            .client
            .post(self.url("/candidates/upload"))
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn delete_candidate(&self, id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&format!("/candidates/{id}")))
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn list_jobs(&self, page: u32, page_size: u32) -> Result<Page<Job>, BackendError> {
        let response = self
            .client
            .get(self.url("/jobs"))
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        let payload: JobListPayload = read_json(response).await?;
        Ok(payload.into_page(page, page_size))
    }

    async fn list_all_jobs(&self) -> Result<Vec<Job>, BackendError> {
        let response = self.client.get(self.url("/jobs/all")).send().await?;
        let payload: JobListPayload = read_json(response).await?;
        Ok(match payload {
            JobListPayload::Bare(jobs) => jobs,
            JobListPayload::Paged { results, .. } => results,
        })
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, BackendError> {
        let response = self
            .client
            .post(self.url("/jobs"))
            .json(job)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&format!("/jobs/{id}")))
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn process_matching(&self, job_name: &str) -> Result<MatchRunSummary, BackendError> {
        let response = self
            .client
            .post(self.url("/matching/process"))
            .json(&ProcessMatchingRequest { job_name })
            .send()
            .await?;
        read_json(response).await
    }

    async fn matching_results(
        &self,
        job_name: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MatchResult>, BackendError> {
        let page_param = page.to_string();
        let size_param = page_size.to_string();
        let response = self
            .client
            .get(self.url("/matching/results"))
            .query(&[
                ("job_name", job_name),
                ("page", page_param.as_str()),
                ("page_size", size_param.as_str()),
            ])
            .send()
            .await?;

        let body: MatchResultsResponse = read_json(response).await?;
        Ok(Page {
            items: body.results,
            page,
            page_size,
            total_items: body.total_matching,
            total_pages: body.total_page,
        })
    }

    async fn matching_detail(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchDetail, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/matching/detail/{candidate_id}/{job_id}")))
            .send()
            .await?;
        read_json(response).await
    }
}

/// Reads the body and decodes it as JSON; any non-2xx status is a failure.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend {} returned {}: {}", url, status, body);
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    debug!("Backend {} returned {} ({} bytes)", url, status, body.len());
    serde_json::from_str(&body).map_err(BackendError::Decode)
}

/// Checks the status only; the body of a successful call is ignored.
async fn ensure_success(response: Response) -> Result<(), BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    warn!("Backend {} returned {}: {}", url, status, body);
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}
