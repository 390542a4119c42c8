// Ollama adapter implementation
// Talks to a locally running Ollama server through its native generate API.
// API Reference: https://github.com/ollama/ollama/blob/main/docs/api.md
//
// The request is sent with `stream: false` so the whole completion arrives
// as a single JSON object.

use crate::config::LLMConfig;
use crate::llm::provider::{build_summary_prompt, SummarizeError, Summarizer};
use crate::search::SearchHit;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";

pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
}

// Request types for the Ollama API
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

// Response types for the Ollama API
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OllamaErrorResponse {
    error: String,
}

impl OllamaSummarizer {
    pub fn new(model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_OLLAMA_BASE.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, hit: &SearchHit) -> Result<String, SummarizeError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_summary_prompt(hit),
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        debug!(model = %self.model, title = %hit.title, "Requesting summary from Ollama");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Request(format!("Failed to parse Ollama response: {}", e)))?;

        if let Some(message) = generated.error {
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let summary = generated.response.trim();
        if summary.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        Ok(summary.to_string())
    }
}
