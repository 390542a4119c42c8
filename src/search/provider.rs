use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search credentials not configured")]
    NoApiKey,

    #[error("search credentials rejected: {0}")]
    Unauthorized(String),

    #[error("search quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("search request failed: {0}")]
    RequestFailed(String),

    #[error("failed to parse search results: {0}")]
    ParseError(String),

    #[error("no results found for query")]
    NoResults,

    #[error("no results available (primary: {primary}; fallback: {secondary})")]
    Unavailable { primary: String, secondary: String },
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::RequestFailed(e.to_string())
    }
}

/// One candidate document returned by a search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub year: Option<i32>,
}

impl SearchHit {
    /// Builds a hit, inferring the year from its text. Returns `None` when
    /// the title or URL is blank.
    pub fn new(title: &str, url: &str, snippet: &str) -> Option<Self> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() || url.is_empty() {
            return None;
        }
        let snippet = snippet.trim();
        let year = extract_year(&format!("{} {} {}", title, snippet, url));
        Some(Self {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
            year,
        })
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Backend name, used in logs.
    fn name(&self) -> &str;

    /// Returns at most `max_results` hits in the backend's order. An empty
    /// result set is reported as [`SearchError::NoResults`].
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// First standalone four-digit token between 2010 and 2029.
pub fn extract_year(text: &str) -> Option<i32> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<i32>().ok())
        .find(|year| (2010..=2029).contains(year))
}

/// Shared HTTP client for search backends.
pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("oxidized-agri/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}
