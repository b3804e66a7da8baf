use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::screen::{InFlight, Mount, Notice, Phase, Tracked};
use crate::coordinators::Coordinators;
use crate::errors::WorkflowError;
use crate::models::job::Job;
use crate::models::matching::{MatchDetail, MatchResult, MatchRunSummary, ALL_JOBS};
use crate::models::Page;

/// Results panel content: always scoped to the job it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResults {
    pub job_name: String,
    pub page: Page<MatchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastRun {
    pub job_name: String,
    pub summary: MatchRunSummary,
}

/// Matching screen: job selector, trigger, ranked results and the score
/// breakdown of one candidate.
///
/// Triggers hold the write side of `gate` for the duration of the pass and
/// results fetches hold the read side, so no fetch starts while a pass is
/// running on this screen. State mutexes are never held across an await.
pub struct MatchingController {
    mount: Mount,
    coordinators: Coordinators,
    jobs: Tracked<Vec<Job>>,
    selected: Mutex<Option<String>>,
    results: Tracked<JobResults>,
    detail: Tracked<MatchDetail>,
    last_run: Mutex<Option<LastRun>>,
    gate: RwLock<()>,
    triggering: AtomicBool,
}

impl MatchingController {
    pub fn new(coordinators: Coordinators) -> Self {
        let mount = Mount::new();
        info!(mount_id = %mount.id(), "Matching screen mounted");
        Self {
            mount,
            coordinators,
            jobs: Tracked::new("job_selector"),
            selected: Mutex::new(None),
            results: Tracked::new("match_results"),
            detail: Tracked::new("match_detail"),
            last_run: Mutex::new(None),
            gate: RwLock::new(()),
            triggering: AtomicBool::new(false),
        }
    }

    /// Loads the job selector.
    pub async fn load(&self) {
        let ticket = self.jobs.begin();
        let result = self.coordinators.jobs.list_all_jobs().await;
        self.jobs.finish(ticket, result);
    }

    /// Selects `job_name` (or the "All Jobs" sentinel) and fetches its results.
    pub async fn select(&self, job_name: &str, page: u32) {
        let job_name = job_name.trim();
        if job_name.is_empty() {
            self.mount
                .notify(WorkflowError::field("job_name", "Select a job first"));
            return;
        }
        self.set_selected(job_name);
        self.fetch_results(job_name, page).await;
    }

    /// A detail panel never outlives the job it was opened for.
    fn set_selected(&self, job_name: &str) {
        let previous = self.selected_lock().replace(job_name.to_string());
        if previous.as_deref() != Some(job_name) {
            self.detail.reset();
        }
    }

    /// Opens the score breakdown of `candidate_id` against the selected job.
    /// Candidates never scored for it show as not analyzed, not as an error.
    pub async fn show_detail(&self, candidate_id: &str) {
        let job_id = match self.detail_job_id() {
            Ok(id) => id,
            Err(err) => {
                self.mount.notify(err);
                return;
            }
        };

        let _read = self.gate.read().await;
        if !self.mount.is_mounted() {
            return;
        }
        let ticket = self.detail.begin();
        let result = self
            .coordinators
            .matching
            .fetch_detail(candidate_id, &job_id)
            .await;
        self.detail.finish(ticket, result);
    }

    fn detail_job_id(&self) -> Result<String, WorkflowError> {
        let job_name = self
            .selected()
            .filter(|name| name.as_str() != ALL_JOBS)
            .ok_or_else(|| {
                WorkflowError::field("job_name", "Select a single job to see match details")
            })?;
        let jobs = self.jobs.snapshot();
        jobs.ready()
            .and_then(|jobs| jobs.iter().find(|j| j.job_name == job_name))
            .map(|job| job.id.clone())
            .ok_or_else(|| WorkflowError::field("job_name", format!("Unknown job '{job_name}'")))
    }

    async fn fetch_results(&self, job_name: &str, page: u32) {
        let _read = self.gate.read().await;
        if !self.mount.is_mounted() {
            return;
        }
        let ticket = self.results.begin();
        let result = self
            .coordinators
            .matching
            .fetch_results(job_name, page)
            .await
            .map(|page| JobResults {
                job_name: job_name.to_string(),
                page,
            });
        self.results.finish(ticket, result);
    }

    /// Runs a scoring pass for `job_name`, or for the current selection when
    /// none is given, then reloads that job's results if it is still selected.
    pub async fn trigger(&self, job_name: Option<&str>) {
        let job_name = match self.trigger_target(job_name) {
            Ok(name) => name,
            Err(err) => {
                self.mount.notify(err);
                return;
            }
        };

        let Some(_in_flight) = InFlight::try_acquire(&self.triggering) else {
            self.mount.notify(WorkflowError::field(
                "job_name",
                "Matching is already running",
            ));
            return;
        };
        self.set_selected(&job_name);
        self.mount.clear_notice();

        let outcome = {
            let _write = self.gate.write().await;
            self.coordinators.matching.trigger_match(&job_name).await
        };

        if !self.mount.is_mounted() {
            debug!(mount_id = %self.mount.id(), "Match pass finished after unmount");
            return;
        }

        match outcome {
            Ok(summary) => {
                self.mount.notify(Notice::success(format!(
                    "Matching finished: {} processed, {} skipped",
                    summary.processed, summary.skipped
                )));
                *self.last_run.lock().unwrap_or_else(PoisonError::into_inner) = Some(LastRun {
                    job_name: job_name.clone(),
                    summary,
                });
                // Scores may have changed under an open detail panel.
                self.detail.reset();
                let still_selected = self.selected().as_deref() == Some(job_name.as_str());
                if still_selected {
                    self.fetch_results(&job_name, 1).await;
                }
            }
            // Results already on screen stay; the failure is shown beside them.
            Err(err) => self.mount.notify(err),
        }
    }

    fn trigger_target(&self, requested: Option<&str>) -> Result<String, WorkflowError> {
        let job_name = requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| self.selected())
            .ok_or_else(|| {
                WorkflowError::field("job_name", "Select a job before starting matching")
            })?;

        if job_name == ALL_JOBS {
            return Err(WorkflowError::field(
                "job_name",
                "Select a single job to run matching",
            ));
        }

        let jobs = self.jobs.snapshot();
        let known = jobs
            .ready()
            .is_some_and(|jobs| jobs.iter().any(|j| j.job_name == job_name));
        if !known {
            return Err(WorkflowError::field(
                "job_name",
                format!("Unknown job '{job_name}'"),
            ));
        }
        Ok(job_name)
    }

    fn selected_lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn selected(&self) -> Option<String> {
        self.selected_lock().clone()
    }

    pub fn jobs(&self) -> Phase<Vec<Job>> {
        self.jobs.snapshot()
    }

    pub fn results(&self) -> Phase<JobResults> {
        self.results.snapshot()
    }

    pub fn detail(&self) -> Phase<MatchDetail> {
        self.detail.snapshot()
    }

    pub fn last_run(&self) -> Option<LastRun> {
        self.last_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_triggering(&self) -> bool {
        self.triggering.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.mount.notice()
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub fn unmount(&self) {
        self.mount.unmount();
        self.jobs.unmount();
        self.results.unmount();
        self.detail.unmount();
    }
}
