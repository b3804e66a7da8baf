use tracing::info;

use super::BackendHandle;
use crate::errors::WorkflowError;
use crate::models::job::{Job, NewJob};
use crate::models::Page;

/// Checks a job form locally. Both fields must be non-empty after trimming;
/// the returned request carries the trimmed values.
pub fn validate_new_job(title: &str, description: &str) -> Result<NewJob, WorkflowError> {
    let job_name = title.trim();
    if job_name.is_empty() {
        return Err(WorkflowError::field("job_name", "Job title is required"));
    }
    let job_description = description.trim();
    if job_description.is_empty() {
        return Err(WorkflowError::field(
            "job_description",
            "Job description is required",
        ));
    }
    Ok(NewJob {
        job_name: job_name.to_string(),
        job_description: job_description.to_string(),
    })
}

#[derive(Clone)]
pub struct JobCoordinator {
    handle: BackendHandle,
}

impl JobCoordinator {
    pub fn new(handle: BackendHandle) -> Self {
        Self { handle }
    }

    /// One create request. The caller reloads the list afterwards.
    pub async fn create_job(&self, title: &str, description: &str) -> Result<Job, WorkflowError> {
        let new_job = validate_new_job(title, description)?;
        let job = self
            .handle
            .call("create_job", self.handle.backend().create_job(&new_job))
            .await?;
        info!(job_id = %job.id, job_name = %job.job_name, "Job created");
        Ok(job)
    }

    pub async fn list_jobs(&self, page: u32) -> Result<Page<Job>, WorkflowError> {
        self.handle
            .call(
                "list_jobs",
                self.handle
                    .backend()
                    .list_jobs(page.max(1), self.handle.page_size()),
            )
            .await
    }

    /// Flat list for job selectors.
    pub async fn list_all_jobs(&self) -> Result<Vec<Job>, WorkflowError> {
        self.handle
            .call("list_all_jobs", self.handle.backend().list_all_jobs())
            .await
    }

    pub async fn count(&self) -> Result<u64, WorkflowError> {
        self.handle
            .call("list_jobs", self.handle.backend().list_jobs(1, 1))
            .await
            .map(|page| page.total_items)
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), WorkflowError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(WorkflowError::field("id", "Job id is required"));
        }
        self.handle
            .call("delete_job", self.handle.backend().delete_job(id))
            .await?;
        info!(job_id = %id, "Job deleted");
        Ok(())
    }
}
