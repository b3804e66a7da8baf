use serde::Serialize;
use tracing::info;

use super::screen::{Mount, Phase, Tracked};
use crate::coordinators::Coordinators;
use crate::errors::WorkflowError;

/// Headline counts shown on the landing screen. The backend keeps no
/// cross-job match total, so none is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_candidates: u64,
    pub total_jobs: u64,
}

pub struct DashboardController {
    mount: Mount,
    coordinators: Coordinators,
    stats: Tracked<DashboardStats>,
}

impl DashboardController {
    pub fn new(coordinators: Coordinators) -> Self {
        let mount = Mount::new();
        info!(mount_id = %mount.id(), "Dashboard screen mounted");
        Self {
            mount,
            coordinators,
            stats: Tracked::new("dashboard_stats"),
        }
    }

    /// Loads both counts concurrently; either failing fails the panel.
    pub async fn load(&self) {
        let ticket = self.stats.begin();

        let (candidates, jobs) = tokio::join!(
            self.coordinators.candidates.count(),
            self.coordinators.jobs.count(),
        );

        let result: Result<DashboardStats, WorkflowError> = candidates.and_then(|c| {
            jobs.map(|j| DashboardStats {
                total_candidates: c,
                total_jobs: j,
            })
        });
        self.stats.finish(ticket, result);
    }

    pub fn stats(&self) -> Phase<DashboardStats> {
        self.stats.snapshot()
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub fn unmount(&self) {
        self.mount.unmount();
        self.stats.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend_client::fake::{result, FakeBackend};
    use crate::coordinators::test_support::coordinators;

    #[tokio::test]
    async fn test_load_counts_candidates_and_jobs() {
        let fake = Arc::new(
            FakeBackend::new()
                .with_candidate("Ada", "ada@example.com")
                .with_candidate("Bea", "bea@example.com")
                .with_job("Backend Engineer", "Rust")
                .with_results("Backend Engineer", vec![result("Ada", 88.0, true)]),
        );
        let controller = DashboardController::new(coordinators(&fake));

        controller.load().await;

        assert_eq!(
            controller.stats(),
            Phase::Ready(DashboardStats {
                total_candidates: 2,
                total_jobs: 1,
            })
        );
        assert_eq!(fake.call_count("matching_results"), 0);
    }

    #[tokio::test]
    async fn test_job_failure_moves_to_error() {
        let fake = Arc::new(FakeBackend::new().with_candidate("Ada", "ada@example.com"));
        fake.fail("list_jobs");
        let controller = DashboardController::new(coordinators(&fake));

        controller.load().await;

        assert!(matches!(controller.stats(), Phase::Error(WorkflowError::Transport(_))));
    }

    #[tokio::test]
    async fn test_candidate_failure_moves_to_error() {
        let fake = Arc::new(FakeBackend::new());
        fake.fail("list_candidates");
        let controller = DashboardController::new(coordinators(&fake));

        controller.load().await;

        assert!(matches!(controller.stats(), Phase::Error(WorkflowError::Transport(_))));
    }
}
