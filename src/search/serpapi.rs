//! SerpAPI Client
//!
//! Searches Google Scholar through SerpAPI. Selected as the primary provider
//! with `SEARCH_PROVIDER=serpapi`; returns peer-reviewed papers with the
//! publication year taken from the `publication_info` summary
//! ("Authors - Journal, Year - publisher").

use super::provider::{SearchError, SearchHit, SearchProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

/// SerpAPI client for Google Scholar
pub struct SerpApiScholar {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiScholar {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: "https://serpapi.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// SerpAPI reports most failures as `{"error": "..."}`, sometimes with 200.
fn classify_error(status: StatusCode, message: &str) -> SearchError {
    let lower = message.to_lowercase();
    if status == StatusCode::TOO_MANY_REQUESTS
        || lower.contains("run out of searches")
        || lower.contains("rate limit")
    {
        SearchError::QuotaExceeded(message.to_string())
    } else if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || lower.contains("api key")
    {
        SearchError::Unauthorized(message.to_string())
    } else if lower.contains("hasn't returned any results") {
        SearchError::NoResults
    } else {
        SearchError::RequestFailed(message.to_string())
    }
}

/// Year from a Scholar publication summary.
fn scholar_year(summary: Option<&str>) -> Option<i32> {
    summary.and_then(|s| {
        s.split(|c: char| !c.is_numeric())
            .filter(|part| part.len() == 4)
            .filter_map(|y| y.parse::<i32>().ok())
            .find(|&y| (1900..=2030).contains(&y))
    })
}

/// Parses `organic_results` into hits.
pub(crate) fn parse_organic_results(results: &Value, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
    let organic_results = results
        .get("organic_results")
        .ok_or(SearchError::NoResults)?;

    let results_array = organic_results
        .as_array()
        .ok_or_else(|| SearchError::ParseError("Expected array of results".to_string()))?;

    let mut hits = Vec::new();
    for result in results_array {
        let title = result.get("title").and_then(|v| v.as_str()).unwrap_or("");
        let snippet = result.get("snippet").and_then(|v| v.as_str()).unwrap_or("");
        let link = result.get("link").and_then(|v| v.as_str()).unwrap_or("");

        let Some(mut hit) = SearchHit::new(title, link, snippet) else {
            continue;
        };

        let summary = result
            .get("publication_info")
            .and_then(|p| p.get("summary"))
            .and_then(|v| v.as_str());
        hit.year = scholar_year(summary).or(hit.year);

        hits.push(hit);
        if hits.len() >= max_results {
            break;
        }
    }

    if hits.is_empty() {
        return Err(SearchError::NoResults);
    }
    Ok(hits)
}

#[async_trait]
impl SearchProvider for SerpApiScholar {
    fn name(&self) -> &str {
        "serpapi_scholar"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::NoApiKey);
        }

        info!(query = %query, "Searching Google Scholar via SerpAPI");

        let num = max_results.clamp(1, 20).to_string();
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google_scholar"),
                ("q", query),
                ("hl", "en"),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let results: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(classify_error(status, &format!("HTTP {}", status)))
            }
            Err(e) => return Err(SearchError::ParseError(e.to_string())),
        };

        if let Some(message) = results.get("error").and_then(|v| v.as_str()) {
            return Err(classify_error(status, message));
        }
        if !status.is_success() {
            return Err(classify_error(status, &format!("HTTP {}", status)));
        }

        debug!("Raw Scholar response received");

        let hits = parse_organic_results(&results, max_results)?;
        info!(count = hits.len(), "Google Scholar search completed");
        Ok(hits)
    }
}
