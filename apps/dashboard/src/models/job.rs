use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{deserialize_timestamp, Page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub job_name: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Requirement lists extracted by the backend (degree, technical_skill, ...).
    #[serde(flatten)]
    pub requirements: Map<String, Value>,
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub job_name: String,
    pub job_description: String,
}

/// `GET /jobs` returns a paged envelope, `GET /jobs/all` a bare array.
/// Either shape is accepted from either endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobListPayload {
    Bare(Vec<Job>),
    Paged {
        results: Vec<Job>,
        #[serde(default)]
        total_page: Option<u32>,
        #[serde(default)]
        total_job: Option<u64>,
    },
}

impl JobListPayload {
    pub fn into_page(self, page: u32, page_size: u32) -> Page<Job> {
        match self {
            JobListPayload::Bare(jobs) => Page::single(jobs),
            JobListPayload::Paged {
                results,
                total_page,
                total_job,
            } => {
                let total_items = total_job.unwrap_or(results.len() as u64);
                Page {
                    total_pages: total_page.unwrap_or(if total_items == 0 { 0 } else { 1 }),
                    items: results,
                    page,
                    page_size,
                    total_items,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_job_list_becomes_single_page() {
        let payload: JobListPayload = serde_json::from_value(json!([
            { "_id": "j1", "job_name": "QA Engineer", "job_description": "Test automation role" }
        ]))
        .unwrap();

        let page = payload.into_page(1, 10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paged_job_list_keeps_backend_totals() {
        let payload: JobListPayload = serde_json::from_value(json!({
            "results": [{ "_id": "j1", "job_name": "A", "job_description": "a" }],
            "total_page": 3,
            "total_job": 25
        }))
        .unwrap();

        let page = payload.into_page(2, 10);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn test_job_keeps_extracted_requirements() {
        let job: Job = serde_json::from_value(json!({
            "_id": "j1",
            "job_name": "Backend Engineer",
            "job_description": "Rust services",
            "technical_skill": ["rust"]
        }))
        .unwrap();
        assert_eq!(job.requirements["technical_skill"], json!(["rust"]));
    }
}
