//! In-memory recruitment backend for controller and coordinator tests.
//!
//! Behaves like the real backend closely enough for workflow tests: duplicate
//! uploads are skipped, unsupported files are errors, a match pass skips
//! candidates already scored for the job. Every call is recorded, individual
//! operations can be made to fail, and per-call delays can be queued to stage
//! races under a paused tokio clock.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{BackendError, RecruitmentBackend};
use crate::models::candidate::Candidate;
use crate::models::job::{Job, NewJob};
use crate::models::matching::{
    CriterionScore, MatchDetail, MatchResult, MatchRunSummary, ALL_JOBS, NOT_ANALYZED,
};
use crate::models::upload::{UploadFile, UploadOutcome, UploadResponse, UploadStatus};
use crate::models::Page;

#[derive(Default)]
struct FakeData {
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    /// job_name → results of every pass run for it.
    results: HashMap<String, Vec<MatchResult>>,
}

#[derive(Default)]
pub struct FakeBackend {
    data: Mutex<FakeData>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, VecDeque<Duration>>>,
    /// When set, each `matching_results` call stamps its call number into the comments.
    stamp_results: Mutex<bool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidate(self, name: &str, email: &str) -> Self {
        self.data_mut().candidates.push(candidate(name, email));
        self
    }

    pub fn with_job(self, name: &str, description: &str) -> Self {
        self.data_mut().jobs.push(job(name, description));
        self
    }

    /// Seeds results for `job_name` as if a pass had already run.
    pub fn with_results(self, job_name: &str, results: Vec<MatchResult>) -> Self {
        self.data_mut().results.insert(job_name.to_string(), results);
        self
    }

    /// Every following call to `op` fails with a 500.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Queues a delay for the next call to `op`.
    pub fn delay_next(&self, op: &'static str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(delay);
    }

    pub fn stamp_results(&self) {
        *self.stamp_results.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn candidate_count(&self) -> usize {
        self.data_mut().candidates.len()
    }

    pub fn candidate_id(&self, name: &str) -> String {
        self.data_mut()
            .candidates
            .iter()
            .find(|c| c.candidate_name.as_deref() == Some(name))
            .map(|c| c.id.clone())
            .unwrap()
    }

    pub fn job_id(&self, name: &str) -> String {
        self.data_mut()
            .jobs
            .iter()
            .find(|j| j.job_name == name)
            .map(|j| j.id.clone())
            .unwrap()
    }

    fn data_mut(&self) -> std::sync::MutexGuard<'_, FakeData> {
        self.data.lock().unwrap()
    }

    /// Records the call, then applies the queued delay and failure switch.
    /// Returns the call's 1-based number for `op`.
    async fn enter(&self, op: &'static str) -> Result<usize, BackendError> {
        let number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(op);
            calls.iter().filter(|c| **c == op).count()
        };

        let delay = self
            .delays
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(|queue| queue.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(op) {
            return Err(BackendError::Status {
                status: 500,
                body: format!("{op} failed"),
            });
        }
        Ok(number)
    }
}

pub fn candidate(name: &str, email: &str) -> Candidate {
    Candidate {
        id: Uuid::new_v4().to_string(),
        candidate_name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone_number: None,
        cv_name: Some(format!("{}.pdf", name.to_lowercase().replace(' ', "_"))),
        created_at: Some(Utc::now()),
        attributes: Default::default(),
    }
}

pub fn job(name: &str, description: &str) -> Job {
    Job {
        id: Uuid::new_v4().to_string(),
        job_name: name.to_string(),
        job_description: description.to_string(),
        created_at: Some(Utc::now()),
        requirements: Default::default(),
    }
}

pub fn result(name: &str, score: f64, matched: bool) -> MatchResult {
    MatchResult {
        id: Uuid::new_v4().to_string(),
        candidate_name: Some(name.to_string()),
        candidate_email: Some(format!("{}@example.com", name.to_lowercase())),
        candidate_phone: None,
        cv_name: None,
        score,
        comment: None,
        matching_status: matched,
    }
}

fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> Page<T> {
    let page_size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1) * page_size;
    let total_items = items.len();
    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        page,
        page_size: page_size as u32,
        total_items: total_items as u64,
        total_pages: total_items.div_ceil(page_size) as u32,
    }
}

fn not_found(what: &str) -> BackendError {
    BackendError::Status {
        status: 404,
        body: format!("{what} not found"),
    }
}

#[async_trait]
impl RecruitmentBackend for FakeBackend {
    async fn list_candidates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Candidate>, BackendError> {
        self.enter("list_candidates").await?;
        Ok(paginate(&self.data_mut().candidates, page, page_size))
    }

    async fn upload_candidates(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<UploadResponse, BackendError> {
        self.enter("upload_candidates").await?;
        let mut data = self.data_mut();
        let mut results = Vec::new();
        for file in files {
            let lower = file.file_name.to_lowercase();
            if !(lower.ends_with(".pdf") || lower.ends_with(".docx")) {
                results.push(UploadOutcome::error(
                    file.file_name,
                    "Invalid file type. Only PDF and DOCX are allowed.",
                ));
                continue;
            }
            let exists = data
                .candidates
                .iter()
                .any(|c| c.cv_name.as_deref() == Some(file.file_name.as_str()));
            if exists {
                results.push(UploadOutcome {
                    filename: file.file_name,
                    status: UploadStatus::Skipped,
                    message: Some("File already exists".to_string()),
                    candidate_id: None,
                });
                continue;
            }
            let stem = file.file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or("");
            let mut created = candidate(stem, &format!("{stem}@example.com"));
            created.cv_name = Some(file.file_name.clone());
            results.push(UploadOutcome {
                filename: file.file_name,
                status: UploadStatus::Success,
                message: None,
                candidate_id: Some(created.id.clone()),
            });
            data.candidates.push(created);
        }
        Ok(UploadResponse { results })
    }

    async fn delete_candidate(&self, id: &str) -> Result<(), BackendError> {
        self.enter("delete_candidate").await?;
        let mut data = self.data_mut();
        let before = data.candidates.len();
        data.candidates.retain(|c| c.id != id);
        if data.candidates.len() == before {
            return Err(not_found("Candidate"));
        }
        Ok(())
    }

    async fn list_jobs(&self, page: u32, page_size: u32) -> Result<Page<Job>, BackendError> {
        self.enter("list_jobs").await?;
        Ok(paginate(&self.data_mut().jobs, page, page_size))
    }

    async fn list_all_jobs(&self) -> Result<Vec<Job>, BackendError> {
        self.enter("list_all_jobs").await?;
        Ok(self.data_mut().jobs.clone())
    }

    async fn create_job(&self, new_job: &NewJob) -> Result<Job, BackendError> {
        self.enter("create_job").await?;
        let mut data = self.data_mut();
        if data.jobs.iter().any(|j| j.job_name == new_job.job_name) {
            return Err(BackendError::Status {
                status: 409,
                body: "Job already exists".to_string(),
            });
        }
        let created = job(&new_job.job_name, &new_job.job_description);
        data.jobs.push(created.clone());
        Ok(created)
    }

    async fn delete_job(&self, id: &str) -> Result<(), BackendError> {
        self.enter("delete_job").await?;
        let mut data = self.data_mut();
        let before = data.jobs.len();
        data.jobs.retain(|j| j.id != id);
        if data.jobs.len() == before {
            return Err(not_found("Job"));
        }
        Ok(())
    }

    async fn process_matching(&self, job_name: &str) -> Result<MatchRunSummary, BackendError> {
        self.enter("process_matching").await?;
        let mut data = self.data_mut();
        if !data.jobs.iter().any(|j| j.job_name == job_name) {
            return Err(not_found("Job"));
        }

        let candidates = data.candidates.clone();
        let existing = data.results.entry(job_name.to_string()).or_default();
        let mut summary = MatchRunSummary {
            processed: 0,
            skipped: 0,
        };
        for (index, c) in candidates.iter().enumerate() {
            if existing.iter().any(|r| r.id == c.id) {
                summary.skipped += 1;
                continue;
            }
            existing.push(MatchResult {
                id: c.id.clone(),
                candidate_name: c.candidate_name.clone(),
                candidate_email: c.email.clone(),
                candidate_phone: c.phone_number.clone(),
                cv_name: c.cv_name.clone(),
                score: (90 - 15 * index as i64).max(0) as f64,
                comment: Some(format!("Scored against {job_name}")),
                matching_status: true,
            });
            summary.processed += 1;
        }
        Ok(summary)
    }

    async fn matching_results(
        &self,
        job_name: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MatchResult>, BackendError> {
        let number = self.enter("matching_results").await?;
        let data = self.data_mut();

        let mut results = if job_name == ALL_JOBS {
            data.results.values().flatten().cloned().collect::<Vec<_>>()
        } else {
            if !data.jobs.iter().any(|j| j.job_name == job_name) {
                return Err(not_found("Job"));
            }
            data.results.get(job_name).cloned().unwrap_or_default()
        };
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        if *self.stamp_results.lock().unwrap() {
            for r in &mut results {
                r.comment = Some(format!("call {number}"));
            }
        }
        Ok(paginate(&results, page, page_size))
    }

    async fn matching_detail(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchDetail, BackendError> {
        self.enter("matching_detail").await?;
        let data = self.data_mut();
        let candidate = data
            .candidates
            .iter()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| not_found("Candidate"))?;
        let job = data
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .ok_or_else(|| not_found("Job"))?;
        let scored = data
            .results
            .get(&job.job_name)
            .and_then(|results| results.iter().find(|r| r.id == candidate_id));

        let (score, summary, criterion) = match scored {
            Some(r) => (
                r.score,
                r.comment.clone().unwrap_or_default(),
                CriterionScore {
                    score: r.score,
                    comment: format!("Scored against {}", job.job_name),
                },
            ),
            None => (
                0.0,
                "No matching analysis available".to_string(),
                CriterionScore {
                    score: 0.0,
                    comment: NOT_ANALYZED.to_string(),
                },
            ),
        };
        Ok(MatchDetail {
            id: candidate.id.clone(),
            candidate_name: candidate.candidate_name.clone(),
            phone_number: candidate.phone_number.clone(),
            email: candidate.email.clone(),
            cv_name: candidate.cv_name.clone(),
            job_name: job.job_name.clone(),
            job_recommended: Vec::new(),
            score,
            summary_comment: summary,
            degree: criterion.clone(),
            experience: criterion.clone(),
            technical_skill: criterion.clone(),
            responsibility: criterion.clone(),
            certificate: criterion.clone(),
            soft_skill: criterion,
        })
    }
}
