// Summarization layer backed by a local text-generation server

pub mod provider;
pub mod ollama;

pub use provider::*;
pub use ollama::OllamaSummarizer;
