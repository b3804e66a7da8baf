use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::info;

use super::screen::{InFlight, Mount, Notice, Phase, Tracked};
use crate::coordinators::Coordinators;
use crate::errors::WorkflowError;
use crate::models::candidate::Candidate;
use crate::models::upload::{UploadBatchSummary, UploadFile};
use crate::models::Page;

pub struct CandidatesController {
    mount: Mount,
    coordinators: Coordinators,
    list: Tracked<Page<Candidate>>,
    page: AtomicU32,
    uploading: AtomicBool,
    last_upload: Mutex<Option<UploadBatchSummary>>,
}

impl CandidatesController {
    pub fn new(coordinators: Coordinators) -> Self {
        let mount = Mount::new();
        info!(mount_id = %mount.id(), "Candidates screen mounted");
        Self {
            mount,
            coordinators,
            list: Tracked::new("candidate_list"),
            page: AtomicU32::new(1),
            uploading: AtomicBool::new(false),
            last_upload: Mutex::new(None),
        }
    }

    pub async fn load(&self, page: u32) {
        let page = page.max(1);
        self.page.store(page, Ordering::SeqCst);
        let ticket = self.list.begin();
        let result = self.coordinators.candidates.list(page).await;
        self.list.finish(ticket, result);
    }

    pub async fn refresh(&self) {
        self.load(self.page.load(Ordering::SeqCst)).await;
    }

    /// Sends one batch. A second batch while one is pending is rejected.
    /// The list is reloaded whenever at least one candidate was created.
    pub async fn upload(&self, files: Vec<UploadFile>) {
        let Some(_in_flight) = InFlight::try_acquire(&self.uploading) else {
            self.mount.notify(WorkflowError::field(
                "files",
                "An upload is already in progress",
            ));
            return;
        };
        self.mount.clear_notice();

        match self.coordinators.upload.submit_batch(files).await {
            Ok(summary) => {
                self.mount.notify(upload_notice(&summary));
                let created = summary.success_count > 0;
                *self
                    .last_upload
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(summary);
                if created && self.mount.is_mounted() {
                    self.refresh().await;
                }
            }
            Err(err) => self.mount.notify(err),
        }
    }

    pub async fn delete(&self, id: &str) {
        match self.coordinators.candidates.delete(id).await {
            Ok(()) => {
                self.mount.notify(Notice::success("Candidate deleted"));
                if self.mount.is_mounted() {
                    self.refresh().await;
                    let list = self.list.snapshot();
                    if let Some(last) = list.ready().and_then(Page::past_end) {
                        self.load(last).await;
                    }
                }
            }
            Err(err) => self.mount.notify(err),
        }
    }

    pub fn list(&self) -> Phase<Page<Candidate>> {
        self.list.snapshot()
    }

    pub fn page(&self) -> u32 {
        self.page.load(Ordering::SeqCst)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<UploadBatchSummary> {
        self.last_upload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.mount.notice()
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub fn unmount(&self) {
        self.mount.unmount();
        self.list.unmount();
    }
}

fn upload_notice(summary: &UploadBatchSummary) -> Notice {
    let message = format!(
        "{} uploaded, {} skipped, {} failed",
        summary.success_count, summary.skipped_count, summary.error_count
    );
    if summary.is_partial() {
        Notice::Partial { message }
    } else {
        Notice::Success { message }
    }
}
