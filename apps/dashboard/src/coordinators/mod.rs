// Coordinators: one per backend resource. Each owns the request/response
// lifecycle of its resource and reconciles responses into workflow types.
// None of them retry, cache, or hold state between calls.

pub mod candidates;
pub mod jobs;
pub mod matching;
pub mod upload;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend_client::{BackendError, RecruitmentBackend};
use crate::errors::WorkflowError;

pub use candidates::CandidateCoordinator;
pub use jobs::JobCoordinator;
pub use matching::MatchCoordinator;
pub use upload::UploadCoordinator;

/// Backend handle shared by all coordinators: the backend itself plus the
/// limits every call runs under.
#[derive(Clone)]
pub struct BackendHandle {
    backend: Arc<dyn RecruitmentBackend>,
    request_timeout: Duration,
    match_timeout: Duration,
    page_size: u32,
}

impl BackendHandle {
    pub fn new(
        backend: Arc<dyn RecruitmentBackend>,
        request_timeout: Duration,
        match_timeout: Duration,
        page_size: u32,
    ) -> Self {
        Self {
            backend,
            request_timeout,
            match_timeout,
            page_size,
        }
    }

    pub fn backend(&self) -> &dyn RecruitmentBackend {
        self.backend.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Awaits a backend call under the regular request timeout.
    pub async fn call<T, F>(&self, op: &'static str, call: F) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        self.call_within(op, self.request_timeout, call).await
    }

    /// Awaits a match pass under the longer match timeout.
    pub async fn call_match<T, F>(&self, op: &'static str, call: F) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        self.call_within(op, self.match_timeout, call).await
    }

    async fn call_within<T, F>(
        &self,
        op: &'static str,
        limit: Duration,
        call: F,
    ) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        debug!(op, "backend call started");
        match tokio::time::timeout(limit, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(op, error = %err, "backend call failed");
                Err(err.into())
            }
            Err(_) => {
                warn!(op, timeout_secs = limit.as_secs(), "backend call timed out");
                Err(BackendError::Timeout(limit).into())
            }
        }
    }
}

/// Every coordinator, built from one shared handle.
#[derive(Clone)]
pub struct Coordinators {
    pub candidates: CandidateCoordinator,
    pub upload: UploadCoordinator,
    pub jobs: JobCoordinator,
    pub matching: MatchCoordinator,
}

impl Coordinators {
    pub fn new(handle: BackendHandle) -> Self {
        Self {
            candidates: CandidateCoordinator::new(handle.clone()),
            upload: UploadCoordinator::new(handle.clone()),
            jobs: JobCoordinator::new(handle.clone()),
            matching: MatchCoordinator::new(handle),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use super::{BackendHandle, Coordinators};
    use crate::backend_client::fake::FakeBackend;

    pub const TIMEOUT: Duration = Duration::from_secs(5);

    pub fn handle(fake: &Arc<FakeBackend>) -> BackendHandle {
        BackendHandle::new(fake.clone(), TIMEOUT, TIMEOUT * 4, 10)
    }

    pub fn coordinators(fake: &Arc<FakeBackend>) -> Coordinators {
        Coordinators::new(handle(fake))
    }
}
