use tracing::info;

use super::BackendHandle;
use crate::errors::WorkflowError;
use crate::models::candidate::Candidate;
use crate::models::Page;

#[derive(Clone)]
pub struct CandidateCoordinator {
    handle: BackendHandle,
}

impl CandidateCoordinator {
    pub fn new(handle: BackendHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, page: u32) -> Result<Page<Candidate>, WorkflowError> {
        let page = page.max(1);
        self.handle
            .call(
                "list_candidates",
                self.handle
                    .backend()
                    .list_candidates(page, self.handle.page_size()),
            )
            .await
    }

    /// Number of stored candidates, read from the first page's totals.
    pub async fn count(&self) -> Result<u64, WorkflowError> {
        self.handle
            .call("list_candidates", self.handle.backend().list_candidates(1, 1))
            .await
            .map(|page| page.total_items)
    }

    pub async fn delete(&self, id: &str) -> Result<(), WorkflowError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(WorkflowError::field("id", "Candidate id is required"));
        }
        self.handle
            .call("delete_candidate", self.handle.backend().delete_candidate(id))
            .await?;
        info!(candidate_id = %id, "Candidate deleted");
        Ok(())
    }
}
