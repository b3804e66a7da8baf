use serde::{Deserialize, Serialize};

/// Job name the backend understands as "results across every job".
pub const ALL_JOBS: &str = "All Jobs";

/// One candidate's standing against the job a match pass ran for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_email: Option<String>,
    #[serde(default)]
    pub candidate_phone: Option<String>,
    #[serde(default)]
    pub cv_name: Option<String>,
    #[serde(default)]
    pub score: f64, // 0 - 100
    #[serde(default, alias = "summary_comment")]
    pub comment: Option<String>,
    #[serde(default)]
    pub matching_status: bool,
}

/// Comment the backend fills in for criteria of a candidate never scored
/// against the job.
pub const NOT_ANALYZED: &str = "Not analyzed";

/// Score and reviewer comment for one criterion of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub comment: String,
}

impl CriterionScore {
    pub fn is_analyzed(&self) -> bool {
        self.comment.trim() != NOT_ANALYZED
    }
}

/// Wire shape of `GET /matching/detail/{candidate_id}/{job_id}`: one
/// candidate's full score breakdown against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub id: String,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cv_name: Option<String>,
    #[serde(default)]
    pub job_name: String,
    #[serde(default)]
    pub job_recommended: Vec<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub summary_comment: String,
    #[serde(default)]
    pub degree: CriterionScore,
    #[serde(default)]
    pub experience: CriterionScore,
    #[serde(default)]
    pub technical_skill: CriterionScore,
    #[serde(default)]
    pub responsibility: CriterionScore,
    #[serde(default)]
    pub certificate: CriterionScore,
    #[serde(default)]
    pub soft_skill: CriterionScore,
}

impl MatchDetail {
    /// Criteria in display order, keyed by their wire names.
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 6] {
        [
            ("degree", &self.degree),
            ("experience", &self.experience),
            ("technical_skill", &self.technical_skill),
            ("responsibility", &self.responsibility),
            ("certificate", &self.certificate),
            ("soft_skill", &self.soft_skill),
        ]
    }

    /// False for the placeholder the backend returns when no pass has
    /// scored this candidate for the job yet.
    pub fn is_analyzed(&self) -> bool {
        self.criteria().iter().any(|(_, c)| c.is_analyzed())
    }
}

/// Wire shape of `GET /matching/results`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResultsResponse {
    #[serde(default)]
    pub results: Vec<MatchResult>,
    #[serde(default)]
    pub total_page: u32,
    #[serde(default)]
    pub total_matching: u64,
}

/// Body of `POST /matching/process`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessMatchingRequest<'a> {
    pub job_name: &'a str,
}

/// Aggregate counts returned by one match pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRunSummary {
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_comment_is_read_as_comment() {
        let result: MatchResult = serde_json::from_value(json!({
            "id": "c1",
            "candidate_name": "Ada",
            "score": 72.5,
            "summary_comment": "Solid backend background",
            "matching_status": true
        }))
        .unwrap();

        assert_eq!(result.comment.as_deref(), Some("Solid backend background"));
        assert!(result.matching_status);
    }

    #[test]
    fn test_unscored_detail_is_not_analyzed() {
        let not_analyzed = json!({"score": 0, "comment": "Not analyzed"});
        let detail: MatchDetail = serde_json::from_value(json!({
            "id": "c1",
            "candidate_name": "Ada",
            "phone_number": "",
            "email": "ada@example.com",
            "cv_name": "ada.pdf",
            "job_name": "Backend Engineer",
            "job_recommended": ["Backend Engineer"],
            "score": 0,
            "summary_comment": "No matching analysis available",
            "degree": not_analyzed,
            "experience": not_analyzed,
            "technical_skill": not_analyzed,
            "responsibility": not_analyzed,
            "certificate": not_analyzed,
            "soft_skill": not_analyzed
        }))
        .unwrap();

        assert!(!detail.is_analyzed());
        assert_eq!(detail.criteria()[2].0, "technical_skill");
    }

    #[test]
    fn test_one_scored_criterion_makes_detail_analyzed() {
        let detail: MatchDetail = serde_json::from_value(json!({
            "id": "c1",
            "score": 71.5,
            "experience": {"score": 80, "comment": "Six years of Rust"}
        }))
        .unwrap();

        assert!(detail.is_analyzed());
        assert_eq!(detail.experience.score, 80.0);
    }

    #[test]
    fn test_run_summary_ignores_message_field() {
        let summary: MatchRunSummary = serde_json::from_value(json!({
            "message": "Matching process completed",
            "processed": 4,
            "skipped": 1
        }))
        .unwrap();
        assert_eq!(summary, MatchRunSummary { processed: 4, skipped: 1 });
    }
}
