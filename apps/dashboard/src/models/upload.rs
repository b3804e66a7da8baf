use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A resume file picked by the user, held in memory until the batch is sent.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
    Skipped,
    Error,
}

/// Per-file result of an upload batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub status: UploadStatus,
    #[serde(default, alias = "reason", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
}

impl UploadOutcome {
    pub fn error(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: UploadStatus::Error,
            message: Some(message.into()),
            candidate_id: None,
        }
    }
}

/// Wire shape of `POST /candidates/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub results: Vec<UploadOutcome>,
}

/// Reconciled result of one upload batch. Counts always add up to the number
/// of files the user submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadBatchSummary {
    pub success_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadBatchSummary {
    pub fn from_outcomes(outcomes: Vec<UploadOutcome>) -> Self {
        let count = |status: UploadStatus| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            success_count: count(UploadStatus::Success),
            skipped_count: count(UploadStatus::Skipped),
            error_count: count(UploadStatus::Error),
            outcomes,
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.skipped_count + self.error_count
    }

    /// True when at least one file did not end up as a new candidate.
    pub fn is_partial(&self) -> bool {
        self.skipped_count + self.error_count > 0
    }
}
