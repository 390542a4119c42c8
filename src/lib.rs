// Oxidized Agri - AI research agent for agriculture papers

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod search;    // Google / SerpAPI primary with DuckDuckGo fallback
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use agents::{ResearchAgent, RunError};

use std::sync::Arc;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

/// Wire the store, search chain and summarizer from configuration.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let pool = db::create_pool(&config.database).await?;
    let store = db::JobStore::new(pool);

    let agent = ResearchAgent::new(
        store.clone(),
        search::build_search_provider(&config.search),
        Box::new(llm::OllamaSummarizer::from_config(&config.llm)),
        config.agent.clone(),
    );

    Ok(AppState {
        store,
        agent: Arc::new(agent),
    })
}
