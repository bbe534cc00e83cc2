//! Embedding configuration.

use mentor_core::AppConfig;
use serde::{Deserialize, Serialize};

/// Embedding configuration, resolved from the application config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "ollama", "gemini", "mock"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Custom endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Maximum batch size for embedding requests
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    100
}

/// Built-in embedding model for a provider.
pub fn default_embedding_model(provider: &str) -> &'static str {
    match provider {
        "gemini" => "gemini-embedding-001",
        "mock" => "trigram-v1",
        _ => "nomic-embed-text",
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            model: default_embedding_model("mock").to_string(),
            dimensions: 768,
            endpoint: None,
            batch_size: default_batch_size(),
        }
    }
}

impl EmbeddingConfig {
    /// Resolve embedding settings for the active provider.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let provider = config.provider.clone();
        let model = config
            .embedding_model(&provider)
            .unwrap_or_else(|| default_embedding_model(&provider).to_string());

        Self {
            endpoint: config.resolve_endpoint(&provider),
            provider,
            model,
            dimensions: config.knowledge.embedding_dimensions,
            batch_size: default_batch_size(),
        }
    }
}
