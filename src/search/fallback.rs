use super::provider::{SearchError, SearchHit, SearchProvider};
use async_trait::async_trait;
use tracing::{info, warn};

/// Tries `primary`, then `secondary` exactly once if the primary fails for
/// any reason (credentials, quota, transport, empty result set).
pub struct FallbackSearch {
    primary: Box<dyn SearchProvider>,
    secondary: Box<dyn SearchProvider>,
}

impl FallbackSearch {
    pub fn new(primary: Box<dyn SearchProvider>, secondary: Box<dyn SearchProvider>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl SearchProvider for FallbackSearch {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let primary_error = match self.primary.search(query, max_results).await {
            Ok(hits) if !hits.is_empty() => return Ok(hits),
            Ok(_) => SearchError::NoResults,
            Err(e) => e,
        };

        warn!(
            provider = self.primary.name(),
            fallback = self.secondary.name(),
            error = %primary_error,
            "Primary search failed, trying fallback"
        );

        match self.secondary.search(query, max_results).await {
            Ok(hits) if !hits.is_empty() => {
                info!(provider = self.secondary.name(), count = hits.len(), "Fallback search succeeded");
                Ok(hits)
            }
            Ok(_) => Err(SearchError::Unavailable {
                primary: primary_error.to_string(),
                secondary: SearchError::NoResults.to_string(),
            }),
            Err(secondary_error) => Err(SearchError::Unavailable {
                primary: primary_error.to_string(),
                secondary: secondary_error.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        hits: usize,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SearchProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::QuotaExceeded("daily limit".to_string()));
            }
            Ok((0..self.hits.min(max_results))
                .filter_map(|i| SearchHit::new(&format!("{} {}", self.name, i), "https://example.org", ""))
                .collect())
        }
    }

    fn scripted(name: &'static str, hits: usize, fail: bool) -> (Box<dyn SearchProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Scripted { name, hits, fail, calls: calls.clone() }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, _) = scripted("primary", 4, false);
        let (secondary, secondary_calls) = scripted("secondary", 4, false);
        let search = FallbackSearch::new(primary, secondary);

        let hits = search.search("q", 10).await.unwrap();
        assert_eq!(hits.len(), 4);
        assert!(hits[0].title.starts_with("primary"));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback_once() {
        let (primary, primary_calls) = scripted("primary", 0, true);
        let (secondary, secondary_calls) = scripted("secondary", 5, false);
        let search = FallbackSearch::new(primary, secondary);

        let hits = search.search("q", 10).await.unwrap();
        assert_eq!(hits.len(), 5);
        assert!(hits[0].title.starts_with("secondary"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_primary_uses_fallback() {
        let (primary, _) = scripted("primary", 0, false);
        let (secondary, secondary_calls) = scripted("secondary", 2, false);
        let search = FallbackSearch::new(primary, secondary);

        assert_eq!(search.search("q", 10).await.unwrap().len(), 2);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failing_is_unavailable() {
        let (primary, _) = scripted("primary", 0, true);
        let (secondary, _) = scripted("secondary", 0, false);
        let search = FallbackSearch::new(primary, secondary);

        match search.search("q", 10).await {
            Err(SearchError::Unavailable { primary, secondary }) => {
                assert!(primary.contains("quota"));
                assert!(secondary.contains("no results"));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }
}
