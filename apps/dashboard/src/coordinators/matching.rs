use tracing::info;

use super::BackendHandle;
use crate::errors::WorkflowError;
use crate::models::matching::{MatchDetail, MatchResult, MatchRunSummary};
use crate::models::Page;

#[derive(Clone)]
pub struct MatchCoordinator {
    handle: BackendHandle,
}

impl MatchCoordinator {
    pub fn new(handle: BackendHandle) -> Self {
        Self { handle }
    }

    /// Runs one scoring pass for `job_name`. Blocks until the backend has
    /// scored every pending candidate, bounded by the match timeout.
    pub async fn trigger_match(&self, job_name: &str) -> Result<MatchRunSummary, WorkflowError> {
        let job_name = require_job_name(job_name)?;
        info!(job_name, "Starting match pass");
        let summary = self
            .handle
            .call_match(
                "process_matching",
                self.handle.backend().process_matching(job_name),
            )
            .await?;
        info!(
            job_name,
            processed = summary.processed,
            skipped = summary.skipped,
            "Match pass finished"
        );
        Ok(summary)
    }

    /// Idempotent read of the stored results for `job_name`, highest score first.
    pub async fn fetch_results(
        &self,
        job_name: &str,
        page: u32,
    ) -> Result<Page<MatchResult>, WorkflowError> {
        let job_name = require_job_name(job_name)?;
        self.handle
            .call(
                "matching_results",
                self.handle
                    .backend()
                    .matching_results(job_name, page.max(1), self.handle.page_size()),
            )
            .await
    }

    /// Score breakdown of one candidate against one job, both by id.
    pub async fn fetch_detail(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchDetail, WorkflowError> {
        let candidate_id = candidate_id.trim();
        if candidate_id.is_empty() {
            return Err(WorkflowError::field("candidate_id", "Candidate id is required"));
        }
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(WorkflowError::field("job_name", "Select a job first"));
        }
        self.handle
            .call(
                "matching_detail",
                self.handle.backend().matching_detail(candidate_id, job_id),
            )
            .await
    }
}

fn require_job_name(job_name: &str) -> Result<&str, WorkflowError> {
    let trimmed = job_name.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::field("job_name", "Select a job first"));
    }
    Ok(trimmed)
}
