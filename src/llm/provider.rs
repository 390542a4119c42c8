use async_trait::async_trait;
use crate::search::SearchHit;

/// Fixed text stored when a summary could not be generated and the
/// placeholder policy is active.
pub const PLACEHOLDER_SUMMARY: &str = "Summary unavailable.";

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("generation service unreachable: {0}")]
    Unreachable(String),

    #[error("generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for SummarizeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SummarizeError::Unreachable(e.to_string())
        } else {
            SummarizeError::Request(e.to_string())
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Model identifier, used in logs.
    fn model(&self) -> &str;

    async fn summarize(&self, hit: &SearchHit) -> Result<String, SummarizeError>;
}

/// Prompt with the agriculture impact lens.
pub fn build_summary_prompt(hit: &SearchHit) -> String {
    let year = hit
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        r#"You are summarizing AI research papers for an agriculture-focused analyst.
Given title, snippet, url and year, produce a concise summary with:
1) Problem statement
2) Method overview
3) Why it matters for agriculture
4) One caveat
Keep it <=120 words.

Title: {title}
Snippet: {snippet}
URL: {url}
Year: {year}"#,
        title = hit.title,
        snippet = hit.snippet,
        url = hit.url,
        year = year,
    )
}
