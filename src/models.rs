use std::sync::Arc;

use crate::agents::ResearchAgent;
use crate::db::JobStore;
use crate::types::JobStatus;

#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub agent: Arc<ResearchAgent>,
}

// Note: FromRow is needed for runtime query_as (no DATABASE_URL at compile time)

/// A job row as stored. `plan_json` is decoded when the report is assembled.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub job_id: String,
    pub user_id: String,
    pub goal: String,
    pub plan_json: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A paper as it appears in a report.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Paper {
    pub rank_order: i64,
    pub title: String,
    pub url: String,
    pub year: Option<i32>,
    pub summary: String,
}

/// A paper about to be written. `rank_order` is assigned by the store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub url: String,
    pub year: Option<i32>,
    pub summary: String,
    pub snippet: String,
    pub raw: serde_json::Value,
}

/// Structured result of one run, returned by the CLI and the web form.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub user_id: String,
    pub goal: String,
    pub status: JobStatus,
    pub plan: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub papers: Vec<Paper>,
}

/// One line of a user's job history.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub goal: String,
    pub status: JobStatus,
    pub paper_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunRequest {
    pub user_id: String,
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
