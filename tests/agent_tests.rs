mod common;

use common::{hits, memory_store, FakeSearch, FakeSummarizer, Outcome};
use oxidized_agri::config::{AgentConfig, RankStrategy, SummaryFailurePolicy};
use oxidized_agri::llm::PLACEHOLDER_SUMMARY;
use oxidized_agri::search::{FallbackSearch, SearchError};
use oxidized_agri::types::{AppError, JobStatus};
use oxidized_agri::ResearchAgent;
use std::sync::atomic::Ordering;

const GOAL: &str = "top 3 AI agriculture papers";

fn config(cap: usize) -> AgentConfig {
    AgentConfig {
        result_cap: cap,
        ..AgentConfig::default()
    }
}

#[tokio::test]
async fn test_quota_exceeded_primary_falls_back_and_completes() {
    let store = memory_store().await;
    let (primary, primary_calls) = FakeSearch::new("google", Outcome::Quota);
    let (secondary, secondary_calls) = FakeSearch::new("duckduckgo", Outcome::Hits(hits("ddg", 5)));
    let search = FallbackSearch::new(Box::new(primary), Box::new(secondary));
    let agent = ResearchAgent::new(store.clone(), Box::new(search), Box::new(FakeSummarizer::ok()), config(3));

    let report = agent.run("alice", GOAL).await.unwrap();

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(report.papers.len(), 3);
    let ranks: Vec<i64> = report.papers.iter().map(|p| p.rank_order).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(report.papers[0].title, "ddg paper 1");
    assert_eq!(report.papers[0].summary, "Summary of ddg paper 1");
    assert_eq!(report.plan.len(), 5);
    assert_eq!(report.plan[0], format!("Interpret goal: {}", GOAL));
    assert_eq!(store.count_documents(&report.job_id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_both_providers_failing_marks_job_failed() {
    let store = memory_store().await;
    let (primary, _) = FakeSearch::new("google", Outcome::Quota);
    let (secondary, secondary_calls) = FakeSearch::new("duckduckgo", Outcome::Transport);
    let search = FallbackSearch::new(Box::new(primary), Box::new(secondary));
    let agent = ResearchAgent::new(store.clone(), Box::new(search), Box::new(FakeSummarizer::ok()), config(3));

    let err = agent.run("alice", GOAL).await.unwrap_err();

    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err.source, AppError::Search(SearchError::Unavailable { .. })));
    let job_id = err.job_id.expect("job was created");
    let report = store.get_job(&job_id).await.unwrap().unwrap();
    assert_eq!(report.status, JobStatus::Failed);
    assert!(report.papers.is_empty());
}

#[tokio::test]
async fn test_document_count_is_min_of_cap_and_results() {
    for (available, cap, expected) in [(2, 3, 2), (5, 3, 3), (1, 1, 1), (4, 4, 4)] {
        let store = memory_store().await;
        let (search, _) = FakeSearch::new("google", Outcome::Hits(hits("g", available)));
        let agent = ResearchAgent::new(store.clone(), Box::new(search), Box::new(FakeSummarizer::ok()), config(cap));

        let report = agent.run("bob", GOAL).await.unwrap();
        assert_eq!(report.papers.len(), expected, "available={} cap={}", available, cap);
        let ranks: Vec<i64> = report.papers.iter().map(|p| p.rank_order).collect();
        assert_eq!(ranks, (1..=expected as i64).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_summary_failure_aborts_job_by_default() {
    let store = memory_store().await;
    let (search, _) = FakeSearch::new("google", Outcome::Hits(hits("g", 5)));
    let summarizer = FakeSummarizer::failing_on(vec![2]);
    let calls = summarizer.calls.clone();
    let agent = ResearchAgent::new(store.clone(), Box::new(search), Box::new(summarizer), config(3));

    let err = agent.run("carol", GOAL).await.unwrap_err();

    assert!(matches!(err.source, AppError::Generation(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let job_id = err.job_id.unwrap();
    assert_eq!(store.job_status(&job_id).await.unwrap(), Some(JobStatus::Failed));
    // No partial results survive a failed run.
    assert_eq!(store.count_documents(&job_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_placeholder_policy_keeps_document_count() {
    let store = memory_store().await;
    let (search, _) = FakeSearch::new("google", Outcome::Hits(hits("g", 5)));
    let config = AgentConfig {
        summary_failure_policy: SummaryFailurePolicy::Placeholder,
        ..config(3)
    };
    let agent = ResearchAgent::new(store, Box::new(search), Box::new(FakeSummarizer::failing_on(vec![1])), config);

    let report = agent.run("carol", GOAL).await.unwrap();

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(report.papers.len(), 3);
    assert_eq!(report.papers[0].summary, PLACEHOLDER_SUMMARY);
    assert_eq!(report.papers[1].summary, "Summary of g paper 2");
}

#[tokio::test]
async fn test_recent_strategy_orders_newest_first() {
    let store = memory_store().await;
    let (search, _) = FakeSearch::new("google", Outcome::Hits(hits("g", 5)));
    let config = AgentConfig {
        rank_strategy: RankStrategy::Recent,
        ..config(2)
    };
    let agent = ResearchAgent::new(store, Box::new(search), Box::new(FakeSummarizer::ok()), config);

    let report = agent.run("dave", GOAL).await.unwrap();
    let years: Vec<Option<i32>> = report.papers.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![Some(2025), Some(2024)]);
}

#[tokio::test]
async fn test_blank_input_is_rejected_before_job_creation() {
    let store = memory_store().await;
    let (search, calls) = FakeSearch::new("google", Outcome::Hits(hits("g", 3)));
    let agent = ResearchAgent::new(store.clone(), Box::new(search), Box::new(FakeSummarizer::ok()), config(3));

    let err = agent.run("  ", GOAL).await.unwrap_err();
    assert!(err.job_id.is_none());
    assert!(matches!(err.source, AppError::InvalidRequest(_)));

    let err = agent.run("erin", "").await.unwrap_err();
    assert!(err.job_id.is_none());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(store.list_jobs("erin").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_completed_iff_documents_persisted() {
    let store = memory_store().await;

    let (ok_search, _) = FakeSearch::new("google", Outcome::Hits(hits("g", 3)));
    let ok_agent = ResearchAgent::new(store.clone(), Box::new(ok_search), Box::new(FakeSummarizer::ok()), config(3));
    ok_agent.run("frank", GOAL).await.unwrap();

    let (bad_search, _) = FakeSearch::new("google", Outcome::Transport);
    let bad_agent = ResearchAgent::new(store.clone(), Box::new(bad_search), Box::new(FakeSummarizer::ok()), config(3));
    bad_agent.run("frank", GOAL).await.unwrap_err();

    let jobs = store.list_jobs("frank").await.unwrap();
    assert_eq!(jobs.len(), 2);
    for job in jobs {
        assert_eq!(job.status == JobStatus::Completed, job.paper_count > 0);
    }
}
