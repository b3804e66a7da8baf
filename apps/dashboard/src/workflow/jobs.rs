use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::screen::{Mount, Notice, Phase, Tracked};
use crate::coordinators::Coordinators;
use crate::models::job::Job;
use crate::models::Page;

/// Values of the create-job form as last submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub job_name: String,
    #[serde(default)]
    pub job_description: String,
}

pub struct JobsController {
    mount: Mount,
    coordinators: Coordinators,
    list: Tracked<Page<Job>>,
    page: AtomicU32,
    form: Mutex<JobForm>,
}

impl JobsController {
    pub fn new(coordinators: Coordinators) -> Self {
        let mount = Mount::new();
        info!(mount_id = %mount.id(), "Jobs screen mounted");
        Self {
            mount,
            coordinators,
            list: Tracked::new("job_list"),
            page: AtomicU32::new(1),
            form: Mutex::new(JobForm::default()),
        }
    }

    pub async fn load(&self, page: u32) {
        let page = page.max(1);
        self.page.store(page, Ordering::SeqCst);
        let ticket = self.list.begin();
        let result = self.coordinators.jobs.list_jobs(page).await;
        self.list.finish(ticket, result);
    }

    pub async fn refresh(&self) {
        self.load(self.page.load(Ordering::SeqCst)).await;
    }

    /// Submits the form. On failure the submitted values stay in the form;
    /// on success the form is cleared and the list reloaded.
    pub async fn create(&self, form: JobForm) {
        *self.form_lock() = form.clone();

        match self
            .coordinators
            .jobs
            .create_job(&form.job_name, &form.job_description)
            .await
        {
            Ok(job) => {
                *self.form_lock() = JobForm::default();
                self.mount
                    .notify(Notice::success(format!("Job '{}' created", job.job_name)));
                if self.mount.is_mounted() {
                    self.refresh().await;
                }
            }
            Err(err) => self.mount.notify(err),
        }
    }

    pub async fn delete(&self, id: &str) {
        match self.coordinators.jobs.delete_job(id).await {
            Ok(()) => {
                self.mount.notify(Notice::success("Job deleted"));
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

    fn form_lock(&self) -> std::sync::MutexGuard<'_, JobForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Phase<Page<Job>> {
        self.list.snapshot()
    }

    pub fn form(&self) -> JobForm {
        self.form_lock().clone()
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
