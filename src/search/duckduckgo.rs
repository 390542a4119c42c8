//! DuckDuckGo HTML search
//!
//! The no-credential fallback. Posts the query to the HTML endpoint and
//! scrapes `div.result` blocks. Result links are usually wrapped in a
//! DuckDuckGo redirect (`//duckduckgo.com/l/?uddg=<target>`), which is
//! unwrapped here.

use super::provider::{SearchError, SearchHit, SearchProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://html.duckduckgo.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::ParseError(format!("{:?}", e)))
}

/// Resolves DuckDuckGo redirect links to their target.
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    let is_ddg = parsed
        .host_str()
        .map(|h| h.ends_with("duckduckgo.com"))
        .unwrap_or(false);

    if !is_ddg {
        return Some(absolute);
    }

    // Internal links other than redirects (ads, settings) are dropped.
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
}

pub(crate) fn parse_html_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
    let document = Html::parse_document(html);
    let result_selector = selector("div.result")?;
    let title_selector = selector("a.result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let mut hits = Vec::new();
    for element in document.select(&result_selector) {
        if hits.len() >= max_results {
            break;
        }
        let Some(title_elem) = element.select(&title_selector).next() else {
            continue;
        };

        let title = title_elem.text().collect::<String>();
        let Some(url) = title_elem.value().attr("href").and_then(resolve_link) else {
            continue;
        };

        let snippet = element
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<String>())
            .unwrap_or_default();

        if let Some(hit) = SearchHit::new(&title, &url, &snippet) {
            hits.push(hit);
        }
    }

    Ok(hits)
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        info!(query = %query, "Searching DuckDuckGo");

        let response = self
            .client
            .post(format!("{}/html/", self.base_url))
            .form(&[("q", query), ("b", ""), ("kl", "us-en")])
            .send()
            .await?;

        let status = response.status();
        // DuckDuckGo answers throttled clients with 202 and a challenge page.
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::ACCEPTED {
            return Err(SearchError::QuotaExceeded(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Raw DuckDuckGo response received");

        let hits = parse_html_results(&body, max_results)?;
        if hits.is_empty() {
            return Err(SearchError::NoResults);
        }

        info!(count = hits.len(), "DuckDuckGo search completed");
        Ok(hits)
    }
}
