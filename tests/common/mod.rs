#![allow(dead_code)]

use async_trait::async_trait;
use oxidized_agri::db::{create_memory_pool, JobStore};
use oxidized_agri::llm::{SummarizeError, Summarizer};
use oxidized_agri::search::{SearchError, SearchHit, SearchProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn hits(prefix: &str, n: usize) -> Vec<SearchHit> {
    (1..=n)
        .map(|i| SearchHit {
            title: format!("{} paper {}", prefix, i),
            url: format!("https://example.org/{}/{}", prefix, i),
            snippet: format!("AI agriculture research {}", i),
            year: Some(2020 + i as i32),
        })
        .collect()
}

pub enum Outcome {
    Hits(Vec<SearchHit>),
    Quota,
    Transport,
}

/// Search backend returning a fixed outcome and counting calls.
pub struct FakeSearch {
    pub name: &'static str,
    pub outcome: Outcome,
    pub calls: Arc<AtomicUsize>,
}

impl FakeSearch {
    pub fn new(name: &'static str, outcome: Outcome) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Hits(hits) if hits.is_empty() => Err(SearchError::NoResults),
            Outcome::Hits(hits) => Ok(hits.iter().take(max_results).cloned().collect()),
            Outcome::Quota => Err(SearchError::QuotaExceeded("daily limit exceeded".to_string())),
            Outcome::Transport => Err(SearchError::RequestFailed("connection reset".to_string())),
        }
    }
}

/// Summarizer that fails on the listed call numbers (1-based).
pub struct FakeSummarizer {
    pub fail_on: Vec<usize>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeSummarizer {
    pub fn ok() -> Self {
        Self::failing_on(vec![])
    }

    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    fn model(&self) -> &str {
        "fake"
    }

    async fn summarize(&self, hit: &SearchHit) -> Result<String, SummarizeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(SummarizeError::Unreachable("connection refused".to_string()));
        }
        Ok(format!("Summary of {}", hit.title))
    }
}

pub async fn memory_store() -> JobStore {
    JobStore::new(create_memory_pool().await.expect("in-memory pool"))
}
