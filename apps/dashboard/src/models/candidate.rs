use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::deserialize_timestamp;

/// A candidate as produced by the backend's resume extraction.
/// Extracted attribute lists are kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub cv_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// degree, experience, technical_skill, ... Opaque to the dashboard.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Wire shape of `GET /candidates`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateListResponse {
    #[serde(default)]
    pub results: Vec<Candidate>,
    #[serde(default)]
    pub total_file: u64,
    #[serde(default)]
    pub total_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_passes_extracted_attributes_through() {
        let raw = json!({
            "_id": "c1",
            "candidate_name": "Ada",
            "email": "ada@example.com",
            "cv_name": "ada.pdf",
            "created_at": "2024-05-01T09:30:00.123000",
            "technical_skill": ["rust", "sql"],
            "sql": 1
        });

        let candidate: Candidate = serde_json::from_value(raw).unwrap();
        assert_eq!(candidate.id, "c1");
        assert!(candidate.created_at.is_some());
        assert_eq!(candidate.attributes["technical_skill"], json!(["rust", "sql"]));
        assert_eq!(candidate.attributes["sql"], json!(1));
    }

    #[test]
    fn test_candidate_tolerates_missing_optional_fields() {
        let candidate: Candidate = serde_json::from_value(json!({ "_id": "c2" })).unwrap();
        assert!(candidate.candidate_name.is_none());
        assert!(candidate.created_at.is_none());
        assert!(candidate.attributes.is_empty());
    }
}
