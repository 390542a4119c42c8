//! Search Module
//!
//! Finds candidate papers on the web. Every backend implements
//! [`SearchProvider`]; the configured primary is wrapped in a
//! [`FallbackSearch`] so that a failing primary is followed by exactly one
//! attempt against DuckDuckGo, which needs no credentials.
//!
//! - Google Programmable Search (default primary)
//! - Google Scholar via SerpAPI (optional primary)
//! - DuckDuckGo HTML (fallback)

pub mod provider;
pub mod google;
pub mod serpapi;
pub mod duckduckgo;
pub mod fallback;

pub use provider::{extract_year, http_client, SearchError, SearchHit, SearchProvider};
pub use google::GoogleSearch;
pub use serpapi::SerpApiScholar;
pub use duckduckgo::DuckDuckGoSearch;
pub use fallback::FallbackSearch;

use crate::config::{SearchConfig, SearchProviderKind};
use tracing::info;

/// Build the provider chain selected by configuration.
pub fn build_search_provider(config: &SearchConfig) -> Box<dyn SearchProvider> {
    let client = http_client(config.timeout_secs);
    let duckduckgo = DuckDuckGoSearch::new(client.clone())
        .with_base_url(&config.duckduckgo_base_url);

    info!(provider = ?config.provider, "Building search provider");

    match config.provider {
        SearchProviderKind::Google => {
            let google = GoogleSearch::new(
                client,
                &config.google_api_key,
                &config.google_cse_id,
            )
            .with_base_url(&config.google_base_url);
            Box::new(FallbackSearch::new(Box::new(google), Box::new(duckduckgo)))
        }
        SearchProviderKind::SerpApi => {
            let scholar = SerpApiScholar::new(client, &config.serpapi_key)
                .with_base_url(&config.serpapi_base_url);
            Box::new(FallbackSearch::new(Box::new(scholar), Box::new(duckduckgo)))
        }
        SearchProviderKind::DuckDuckGo => Box::new(duckduckgo),
    }
}
