//! Embedding generation.
//!
//! Provider-agnostic embeddings behind [`EmbeddingProvider`], with
//! implementations for Ollama, Gemini and an offline mock.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::{default_embedding_model, EmbeddingConfig};
pub use provider::{create_provider, EmbeddingProvider, EmbeddingTask};

use mentor_core::{AppConfig, AppResult};
use std::sync::Arc;

/// Create the embedding provider for the configured active provider.
pub fn create_provider_from_config(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let embedding_config = EmbeddingConfig::from_app_config(config);
    let api_key = config.resolve_api_key(&embedding_config.provider);

    tracing::debug!(
        "Creating embedding provider: provider={}, model={}, dimensions={}",
        embedding_config.provider,
        embedding_config.model,
        embedding_config.dimensions
    );

    create_provider(&embedding_config, api_key.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_from_config_mock() {
        let mut config = AppConfig {
            provider: "mock".to_string(),
            ..AppConfig::default()
        };
        config.knowledge.embedding_dimensions = 32;

        let provider = create_provider_from_config(&config).unwrap();
        let texts = vec!["hello world".to_string(), "test embedding".to_string()];
        let embeddings = provider
            .embed_batch(&texts, EmbeddingTask::Document)
            .await
            .unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 32);
    }
}
