//! Research Agent
//!
//! Runs one end-to-end workflow for a user and a goal:
//!
//! ```text
//! goal ──▶ plan ──▶ job (pending)
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │   Search    │  primary, then one fallback
//!              └─────────────┘
//!                     │  first N candidates
//!                     ▼
//!              ┌─────────────┐
//!              │  Summarize  │  one call per candidate
//!              └─────────────┘
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │   Persist   │  papers + completed, one transaction
//!              └─────────────┘
//!                     │
//!                     ▼
//!                JobReport
//! ```
//!
//! A job moves `pending → completed` or `pending → failed`. Any error after
//! the job is created marks it failed and no papers are kept.

pub mod planning;

pub use planning::{build_plan, select_candidates, DEFAULT_GOAL, SEARCH_QUERY};

use crate::config::{AgentConfig, SummaryFailurePolicy};
use crate::db::JobStore;
use crate::llm::{Summarizer, PLACEHOLDER_SUMMARY};
use crate::models::{JobReport, PaperRecord};
use crate::search::{SearchError, SearchProvider};
use crate::types::{AppError, AppResult};
use tracing::{error, info, warn};

/// A failed run. `job_id` is set when the job had been created.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct RunError {
    pub job_id: Option<String>,
    pub source: AppError,
}

impl RunError {
    fn before_job(source: AppError) -> Self {
        Self { job_id: None, source }
    }

    fn for_job(job_id: &str, source: AppError) -> Self {
        Self {
            job_id: Some(job_id.to_string()),
            source,
        }
    }
}

pub struct ResearchAgent {
    store: JobStore,
    search: Box<dyn SearchProvider>,
    summarizer: Box<dyn Summarizer>,
    config: AgentConfig,
}

impl ResearchAgent {
    pub fn new(
        store: JobStore,
        search: Box<dyn SearchProvider>,
        summarizer: Box<dyn Summarizer>,
        config: AgentConfig,
    ) -> Self {
        Self {
            store,
            search,
            summarizer,
            config,
        }
    }

    /// Execute the full workflow and return the stored report.
    pub async fn run(&self, user_id: &str, goal: &str) -> Result<JobReport, RunError> {
        let user_id = user_id.trim();
        let goal = goal.trim();
        if user_id.is_empty() {
            return Err(RunError::before_job(AppError::InvalidRequest(
                "user_id must not be empty".to_string(),
            )));
        }
        if goal.is_empty() {
            return Err(RunError::before_job(AppError::InvalidRequest(
                "goal must not be empty".to_string(),
            )));
        }

        let plan = build_plan(goal, self.config.result_cap);
        let job_id = self
            .store
            .create_job(user_id, goal, &plan)
            .await
            .map_err(RunError::before_job)?;

        info!(job_id = %job_id, user_id, provider = self.search.name(), "Starting research run");

        if let Err(e) = self.execute(&job_id).await {
            error!(job_id = %job_id, error = %e, "Research run failed");
            if let Err(mark_err) = self.store.mark_failed(&job_id).await {
                warn!(job_id = %job_id, error = %mark_err, "Could not mark job failed");
            }
            return Err(RunError::for_job(&job_id, e));
        }

        let report = self
            .store
            .get_job(&job_id)
            .await
            .and_then(|report| {
                report.ok_or_else(|| AppError::NotFound(format!("Unknown job_id: {}", job_id)))
            })
            .map_err(|e| RunError::for_job(&job_id, e))?;

        info!(job_id = %job_id, papers = report.papers.len(), "Research run completed");
        Ok(report)
    }

    /// Search, summarize and persist. Nothing is written unless every step
    /// succeeds.
    async fn execute(&self, job_id: &str) -> AppResult<()> {
        let hits = self
            .search
            .search(SEARCH_QUERY, self.config.search_max_results)
            .await?;

        let selected = select_candidates(hits, self.config.result_cap, self.config.rank_strategy);
        if selected.is_empty() {
            return Err(SearchError::NoResults.into());
        }

        info!(
            job_id,
            candidates = selected.len(),
            model = self.summarizer.model(),
            "Summarizing candidates"
        );

        let mut papers = Vec::with_capacity(selected.len());
        for hit in selected {
            let summary = match self.summarizer.summarize(&hit).await {
                Ok(summary) => summary,
                Err(e) if self.config.summary_failure_policy == SummaryFailurePolicy::Placeholder => {
                    warn!(
                        job_id,
                        model = self.summarizer.model(),
                        title = %hit.title,
                        error = %e,
                        "Summary failed, storing placeholder"
                    );
                    PLACEHOLDER_SUMMARY.to_string()
                }
                Err(e) => return Err(e.into()),
            };

            papers.push(PaperRecord {
                raw: serde_json::to_value(&hit)?,
                title: hit.title,
                url: hit.url,
                year: hit.year,
                summary,
                snippet: hit.snippet,
            });
        }

        self.store.complete_job(job_id, &papers).await
    }
}
