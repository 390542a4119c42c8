use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub llm: LLMConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite file. Created on first use.
    pub sqlite_path: String,
    pub max_connections: u32,
}

/// Which backend is tried first. DuckDuckGo is always the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    Google,
    SerpApi,
    DuckDuckGo,
}

impl FromStr for SearchProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "serpapi" => Ok(Self::SerpApi),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(anyhow!("Unsupported search provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub provider: SearchProviderKind,
    pub google_api_key: String,
    pub google_cse_id: String,
    pub google_base_url: String,
    pub serpapi_key: String,
    pub serpapi_base_url: String,
    pub duckduckgo_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStrategy {
    /// Keep the provider's order.
    AsReturned,
    /// Prefer paper-like hits, newest first.
    Recent,
}

impl FromStr for RankStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "as_returned" | "as-returned" => Ok(Self::AsReturned),
            "recent" => Ok(Self::Recent),
            other => Err(anyhow!("Unsupported rank strategy: {}", other)),
        }
    }
}

/// What happens when one summary cannot be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFailurePolicy {
    /// Fail the whole job.
    Abort,
    /// Store a placeholder summary and keep going.
    Placeholder,
}

impl FromStr for SummaryFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(anyhow!("Unsupported summary failure policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Candidates requested from the search backend.
    pub search_max_results: usize,
    /// Papers kept per job.
    pub result_cap: usize,
    pub rank_strategy: RankStrategy,
    pub summary_failure_policy: SummaryFailurePolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            search_max_results: 12,
            result_cap: 3,
            rank_strategy: RankStrategy::AsReturned,
            summary_failure_policy: SummaryFailurePolicy::Abort,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let result_cap: usize = parse_var("RESULT_CAP", "3")?;
        if result_cap == 0 {
            return Err(anyhow!("RESULT_CAP must be at least 1"));
        }
        let search_max_results: usize = parse_var("SEARCH_MAX_RESULTS", "12")?;
        if search_max_results == 0 {
            return Err(anyhow!("SEARCH_MAX_RESULTS must be at least 1"));
        }

        Ok(Self {
            server: ServerConfig {
                port: parse_var("PORT", "3000")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "agent_runs.db".to_string()),
                max_connections: parse_var("DB_MAX_CONNECTIONS", "5")?,
            },
            search: SearchConfig {
                provider: parse_var("SEARCH_PROVIDER", "google")?,
                google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                google_cse_id: env::var("GOOGLE_CSE_ID").unwrap_or_default(),
                google_base_url: env::var("GOOGLE_SEARCH_URL")
                    .unwrap_or_else(|_| "https://www.googleapis.com".to_string()),
                serpapi_key: env::var("SERPAPI_API_KEY").unwrap_or_default(),
                serpapi_base_url: env::var("SERPAPI_URL")
                    .unwrap_or_else(|_| "https://serpapi.com".to_string()),
                duckduckgo_base_url: env::var("DUCKDUCKGO_URL")
                    .unwrap_or_else(|_| "https://html.duckduckgo.com".to_string()),
                timeout_secs: parse_var("HTTP_TIMEOUT_SECS", "60")?,
            },
            llm: LLMConfig {
                ollama_base_url: env::var("OLLAMA_BASE_URL")
                    .or_else(|_| env::var("OLLAMA_HOST"))
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.1".to_string()),
                timeout_secs: parse_var("OLLAMA_TIMEOUT_SECS", "120")?,
            },
            agent: AgentConfig {
                search_max_results,
                result_cap,
                rank_strategy: parse_var("RANK_STRATEGY", "as_returned")?,
                summary_failure_policy: parse_var("SUMMARY_FAILURE_POLICY", "abort")?,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Invalid value for {}: {:?}", name, raw))
}
