use std::path::Path;

use tracing::{info, warn};

use super::BackendHandle;
use crate::errors::WorkflowError;
use crate::models::upload::{UploadBatchSummary, UploadFile, UploadOutcome};

const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Only PDF and DOCX are allowed.";

const MISSING_OUTCOME_MESSAGE: &str = "No outcome reported for this file";

/// True for PDF and DOCX files, judged by extension or declared MIME type.
pub fn is_accepted(file: &UploadFile) -> bool {
    let by_extension = Path::new(&file.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    let by_mime = file
        .content_type
        .as_deref()
        .map(|ct| ACCEPTED_MIME_TYPES.contains(&ct.trim().to_lowercase().as_str()))
        .unwrap_or(false);

    by_extension || by_mime
}

/// Sends resume batches to the extraction service.
#[derive(Clone)]
pub struct UploadCoordinator {
    handle: BackendHandle,
}

impl UploadCoordinator {
    pub fn new(handle: BackendHandle) -> Self {
        Self { handle }
    }

    /// Filters unsupported files, sends the rest as one multipart request and
    /// reconciles the per-file outcomes. The summary has exactly one outcome per
    /// submitted file, in submission order.
    pub async fn submit_batch(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<UploadBatchSummary, WorkflowError> {
        if files.is_empty() {
            return Err(WorkflowError::field("files", "Select at least one file to upload"));
        }

        let total = files.len();
        let mut slots: Vec<Option<UploadOutcome>> = Vec::with_capacity(total);
        let mut accepted = Vec::new();
        let mut accepted_names = Vec::new();

        for file in files {
            if is_accepted(&file) {
                slots.push(None);
                accepted_names.push(file.file_name.clone());
                accepted.push(file);
            } else {
                slots.push(Some(UploadOutcome::error(&file.file_name, INVALID_TYPE_MESSAGE)));
            }
        }

        let mut reported = if accepted.is_empty() {
            Vec::new()
        } else {
            info!("Uploading {} of {} files", accepted.len(), total);
            self.handle
                .call(
                    "upload_candidates",
                    self.handle.backend().upload_candidates(accepted),
                )
                .await?
                .results
        };

        let mut names = accepted_names.into_iter();
        for slot in slots.iter_mut().filter(|s| s.is_none()) {
            let Some(name) = names.next() else { break };
            let outcome = match reported.iter().position(|o| o.filename == name) {
                Some(index) => reported.remove(index),
                None => UploadOutcome::error(name, MISSING_OUTCOME_MESSAGE),
            };
            *slot = Some(outcome);
        }

        if !reported.is_empty() {
            warn!(
                "Backend reported {} outcomes for files that were not submitted",
                reported.len()
            );
        }

        let summary = UploadBatchSummary::from_outcomes(slots.into_iter().flatten().collect());
        debug_assert_eq!(summary.total(), total);
        info!(
            "Upload finished: {} success, {} skipped, {} error",
            summary.success_count, summary.skipped_count, summary.error_count
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::backend_client::fake::FakeBackend;
    use crate::coordinators::test_support::handle;
    use crate::models::upload::UploadStatus;

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, None, Bytes::from_static(b"%PDF-1.4"))
    }

    fn coordinator(fake: &Arc<FakeBackend>) -> UploadCoordinator {
        UploadCoordinator::new(handle(fake))
    }

    #[test]
    fn test_accepts_pdf_and_docx_case_insensitive() {
        assert!(is_accepted(&file("cv.pdf")));
        assert!(is_accepted(&file("CV.DOCX")));
        assert!(!is_accepted(&file("cv.txt")));
        assert!(!is_accepted(&file("cv")));
    }

    #[test]
    fn test_accepts_by_mime_type_without_extension() {
        let upload = UploadFile::new(
            "scan",
            Some("application/pdf".to_string()),
            Bytes::from_static(b"%PDF"),
        );
        assert!(is_accepted(&upload));
    }

    #[tokio::test]
    async fn test_two_pdfs_and_one_unsupported_file() {
        let fake = Arc::new(FakeBackend::new());

        let summary = coordinator(&fake)
            .submit_batch(vec![file("ada.pdf"), file("notes.txt"), file("bea.pdf")])
            .await
            .unwrap();

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.skipped_count, 0);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.outcomes[1].filename, "notes.txt");
        assert_eq!(summary.outcomes[1].message.as_deref(), Some(INVALID_TYPE_MESSAGE));
        assert_eq!(fake.call_count("upload_candidates"), 1);
    }

    #[tokio::test]
    async fn test_counts_always_add_up_to_submitted_files() {
        let fake = Arc::new(FakeBackend::new().with_candidate("Ada", "ada@example.com"));

        let batch = vec![
            file("ada.pdf"), // already uploaded → skipped
            file("bea.docx"),
            file("photo.png"),
            file("bea.docx"), // duplicate inside the batch → skipped by the backend
        ];
        let summary = coordinator(&fake).submit_batch(batch).await.unwrap();

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.outcomes.len(), 4);
        assert_eq!(summary.skipped_count, 2);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 1);
    }

    #[tokio::test]
    async fn test_all_unsupported_files_skip_the_network() {
        let fake = Arc::new(FakeBackend::new());

        let summary = coordinator(&fake)
            .submit_batch(vec![file("a.txt"), file("b.png")])
            .await
            .unwrap();

        assert_eq!(summary.error_count, 2);
        assert_eq!(fake.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_validation_error() {
        let fake = Arc::new(FakeBackend::new());

        let err = coordinator(&fake).submit_batch(vec![]).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fake.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_server_failure_is_one_batch_level_error() {
        let fake = Arc::new(FakeBackend::new());
        fake.fail("upload_candidates");

        let err = coordinator(&fake)
            .submit_batch(vec![file("ada.pdf"), file("bea.pdf")])
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Transport(_)));
        assert_eq!(fake.call_count("upload_candidates"), 1);
    }

    #[tokio::test]
    async fn test_successful_outcomes_carry_candidate_ids() {
        let fake = Arc::new(FakeBackend::new());

        let summary = coordinator(&fake).submit_batch(vec![file("ada.pdf")]).await.unwrap();

        assert_eq!(summary.outcomes[0].status, UploadStatus::Success);
        assert!(summary.outcomes[0].candidate_id.is_some());
        assert_eq!(fake.candidate_count(), 1);
    }
}
