//! Result formatting: pure mappings from backend records to display rows.
//!
//! Tier thresholds are fixed: ≥80 top, ≥60 high, ≥40 medium, otherwise low.

use serde::Serialize;

use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::models::matching::{MatchDetail, MatchResult};

/// Display bucket of a match score. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
    Top,
}

pub fn score_to_tier(score: f64) -> Tier {
    if score >= 80.0 {
        Tier::Top
    } else if score >= 60.0 {
        Tier::High
    } else if score >= 40.0 {
        Tier::Medium
    } else {
        Tier::Low // also NaN
    }
}

pub fn status_label(matched: bool) -> &'static str {
    if matched {
        "Matched"
    } else {
        "Pending"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub candidate_id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub score: f64,
    pub score_label: String, // "87%"
    pub tier: Tier,
    pub status: &'static str,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cv_name: String,
    pub uploaded: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionRow {
    pub criterion: &'static str,
    pub score_label: String,
    pub comment: String,
    pub status: &'static str,
}

/// One candidate's score breakdown against one job, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSheet {
    pub candidate_id: String,
    pub candidate_name: String,
    pub email: String,
    pub phone: String,
    pub cv_name: String,
    pub job_name: String,
    pub score_label: String,
    pub tier: Tier,
    pub status: &'static str,
    pub summary: String,
    pub criteria: Vec<CriterionRow>,
    pub recommended_jobs: Vec<String>,
}

/// Ranks results by score, highest first, and numbers them starting after `offset`.
/// Equal scores keep their backend order.
pub fn result_rows(results: &[MatchResult], offset: usize) -> Vec<ResultRow> {
    let mut ranked: Vec<&MatchResult> = results.iter().collect();
    ranked.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, r)| ResultRow {
            rank: offset + i + 1,
            candidate_id: r.id.clone(),
            candidate_name: non_empty_or(r.candidate_name.as_deref(), "Unknown"),
            candidate_email: non_empty_or(r.candidate_email.as_deref(), "-"),
            score: r.score,
            score_label: format!("{}%", r.score.round() as i64),
            tier: score_to_tier(r.score),
            status: status_label(r.matching_status),
            comment: r.comment.clone().filter(|c| !c.trim().is_empty()),
        })
        .collect()
}

pub fn candidate_rows(candidates: &[Candidate]) -> Vec<CandidateRow> {
    candidates
        .iter()
        .map(|c| CandidateRow {
            id: c.id.clone(),
            name: non_empty_or(c.candidate_name.as_deref(), "Unknown"),
            email: non_empty_or(c.email.as_deref(), "-"),
            cv_name: non_empty_or(c.cv_name.as_deref(), "-"),
            uploaded: c
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

pub fn job_rows(jobs: &[Job]) -> Vec<JobRow> {
    jobs.iter()
        .map(|j| JobRow {
            id: j.id.clone(),
            title: j.job_name.clone(),
            created: j
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

/// Not-analyzed criteria (and a detail with none analyzed) show as Pending
/// with a "-" score rather than a zero.
pub fn detail_sheet(detail: &MatchDetail) -> DetailSheet {
    let analyzed = detail.is_analyzed();
    DetailSheet {
        candidate_id: detail.id.clone(),
        candidate_name: non_empty_or(detail.candidate_name.as_deref(), "Unknown"),
        email: non_empty_or(detail.email.as_deref(), "-"),
        phone: non_empty_or(detail.phone_number.as_deref(), "-"),
        cv_name: non_empty_or(detail.cv_name.as_deref(), "-"),
        job_name: detail.job_name.clone(),
        score_label: percent_or_dash(detail.score, analyzed),
        tier: score_to_tier(detail.score),
        status: status_label(analyzed),
        summary: non_empty_or(Some(detail.summary_comment.as_str()), "-"),
        criteria: detail
            .criteria()
            .into_iter()
            .map(|(criterion, c)| CriterionRow {
                criterion,
                score_label: percent_or_dash(c.score, c.is_analyzed()),
                comment: non_empty_or(Some(c.comment.as_str()), "-"),
                status: status_label(c.is_analyzed()),
            })
            .collect(),
        recommended_jobs: detail.job_recommended.clone(),
    }
}

fn percent_or_dash(score: f64, analyzed: bool) -> String {
    if analyzed {
        format!("{}%", score.round() as i64)
    } else {
        "-".to_string()
    }
}

fn sort_key(result: &MatchResult) -> f64 {
    if result.score.is_nan() {
        f64::NEG_INFINITY
    } else {
        result.score
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
