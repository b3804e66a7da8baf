//! State → view. Every function here reads controller snapshots and builds a
//! serialisable view; none of them touch the network or mutate state.

use serde::Serialize;

use crate::formatter::{
    candidate_rows, detail_sheet, job_rows, result_rows, CandidateRow, DetailSheet, JobRow,
    ResultRow,
};
use crate::models::matching::ALL_JOBS;
use crate::models::upload::UploadBatchSummary;
use crate::workflow::candidates::CandidatesController;
use crate::workflow::dashboard::{DashboardController, DashboardStats};
use crate::workflow::jobs::{JobForm, JobsController};
use crate::workflow::matching::{LastRun, MatchingController};
use crate::workflow::screen::{Notice, Phase};
use crate::workflow::ActiveScreen;

// ────────────────────────────────────────────────────────────────────────────
// View types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelView<T> {
    Idle,
    Loading,
    Ready { data: T },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedRows<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub mount_id: String,
    pub stats: PanelView<DashboardStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatesView {
    pub mount_id: String,
    /// Page the list was last asked for.
    pub page: u32,
    pub list: PanelView<PagedRows<CandidateRow>>,
    pub uploading: bool,
    pub last_upload: Option<UploadBatchSummary>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobsView {
    pub mount_id: String,
    pub list: PanelView<PagedRows<JobRow>>,
    pub form: JobForm,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPanel {
    pub job_name: String,
    pub rows: Vec<ResultRow>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingView {
    pub mount_id: String,
    /// First option is always the "All Jobs" sentinel.
    pub job_options: PanelView<Vec<JobOption>>,
    pub selected_job: Option<String>,
    pub running: bool,
    pub results: PanelView<ResultsPanel>,
    pub detail: PanelView<DetailSheet>,
    pub last_run: Option<LastRun>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenView {
    Dashboard(DashboardView),
    Candidates(CandidatesView),
    Jobs(JobsView),
    Matching(MatchingView),
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

fn panel<T, V>(phase: Phase<T>, view: impl FnOnce(T) -> V) -> PanelView<V> {
    match phase {
        Phase::Idle => PanelView::Idle,
        Phase::Loading => PanelView::Loading,
        Phase::Ready(value) => PanelView::Ready { data: view(value) },
        Phase::Error(err) => PanelView::Error {
            message: err.to_string(),
        },
    }
}

fn pagination(page: u32, total_pages: u32, total_items: u64) -> Pagination {
    Pagination {
        page,
        total_pages,
        total_items,
    }
}

pub fn dashboard(controller: &DashboardController) -> DashboardView {
    DashboardView {
        mount_id: controller.mount().id().to_string(),
        stats: panel(controller.stats(), |stats| stats),
    }
}

pub fn candidates(controller: &CandidatesController) -> CandidatesView {
    CandidatesView {
        mount_id: controller.mount().id().to_string(),
        page: controller.page(),
        list: panel(controller.list(), |page| PagedRows {
            rows: candidate_rows(&page.items),
            pagination: pagination(page.page, page.total_pages, page.total_items),
        }),
        uploading: controller.is_uploading(),
        last_upload: controller.last_upload(),
        notice: controller.notice(),
    }
}

pub fn jobs(controller: &JobsController) -> JobsView {
    JobsView {
        mount_id: controller.mount().id().to_string(),
        list: panel(controller.list(), |page| PagedRows {
            rows: job_rows(&page.items),
            pagination: pagination(page.page, page.total_pages, page.total_items),
        }),
        form: controller.form(),
        notice: controller.notice(),
    }
}

pub fn matching(controller: &MatchingController) -> MatchingView {
    MatchingView {
        mount_id: controller.mount().id().to_string(),
        job_options: panel(controller.jobs(), |jobs| {
            std::iter::once(JobOption {
                value: ALL_JOBS.to_string(),
                label: ALL_JOBS.to_string(),
            })
            .chain(jobs.into_iter().map(|job| JobOption {
                value: job.job_name.clone(),
                label: job.job_name,
            }))
            .collect()
        }),
        selected_job: controller.selected(),
        running: controller.is_triggering(),
        results: panel(controller.results(), |results| ResultsPanel {
            rows: result_rows(&results.page.items, results.page.offset()),
            pagination: pagination(
                results.page.page,
                results.page.total_pages,
                results.page.total_items,
            ),
            job_name: results.job_name,
        }),
        detail: panel(controller.detail(), |detail| detail_sheet(&detail)),
        last_run: controller.last_run(),
        notice: controller.notice(),
    }
}

pub fn screen(active: &ActiveScreen) -> ScreenView {
    match active {
        ActiveScreen::Dashboard(c) => ScreenView::Dashboard(dashboard(c)),
        ActiveScreen::Candidates(c) => ScreenView::Candidates(candidates(c)),
        ActiveScreen::Jobs(c) => ScreenView::Jobs(jobs(c)),
        ActiveScreen::Matching(c) => ScreenView::Matching(matching(c)),
    }
}
