//! Google Programmable Search (Custom Search JSON API)
//!
//! Requires an API key and a search engine id (`cx`). The API returns at most
//! ten items per request, so larger requests are clamped.

use super::provider::{SearchError, SearchHit, SearchProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

const GOOGLE_MAX_PER_REQUEST: usize = 10;

pub struct GoogleSearch {
    client: Client,
    api_key: String,
    cse_id: String,
    base_url: String,
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    reason: String,
}

impl GoogleSearch {
    pub fn new(client: Client, api_key: &str, cse_id: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            cse_id: cse_id.to_string(),
            base_url: "https://www.googleapis.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.cse_id.trim().is_empty()
    }
}

/// Maps a failed response to the search error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> SearchError {
    let parsed = serde_json::from_str::<GoogleErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));
    let quota_reason = parsed
        .as_ref()
        .map(|e| {
            e.error.errors.iter().any(|d| {
                let reason = d.reason.to_lowercase();
                reason.contains("limitexceeded") || reason.contains("quotaexceeded")
            })
        })
        .unwrap_or(false);

    if status == StatusCode::TOO_MANY_REQUESTS || quota_reason {
        SearchError::QuotaExceeded(message)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        SearchError::Unauthorized(message)
    } else {
        SearchError::RequestFailed(message)
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        if !self.has_credentials() {
            return Err(SearchError::NoApiKey);
        }

        let num = max_results.clamp(1, GOOGLE_MAX_PER_REQUEST);
        let num_param = num.to_string();
        info!(query = %query, num, "Searching Google Programmable Search");

        let response = self
            .client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", num_param.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        debug!("Raw Google response received");

        let parsed: GoogleResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let hits: Vec<SearchHit> = parsed
            .items
            .iter()
            .filter_map(|item| SearchHit::new(&item.title, &item.link, &item.snippet))
            .take(max_results)
            .collect();

        if hits.is_empty() {
            return Err(SearchError::NoResults);
        }

        info!(count = hits.len(), "Google search completed");
        Ok(hits)
    }
}
