//! Embedding provider trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::providers::{GeminiProvider, MockProvider, OllamaProvider};
use mentor_core::{AppError, AppResult};
use std::sync::Arc;

/// What an embedding will be used for.
///
/// Hosted models tune vectors differently for stored documents and for
/// search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    Document,
    Query,
}

impl EmbeddingTask {
    pub fn as_task_type(&self) -> &'static str {
        match self {
            Self::Document => "RETRIEVAL_DOCUMENT",
            Self::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "gemini", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String], task: EmbeddingTask)
        -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str, task: EmbeddingTask) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()], task).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Reject vectors whose length differs from the configured dimension.
pub(crate) fn check_dimensions(expected: usize, embedding: &[f32]) -> AppResult<()> {
    if embedding.len() != expected {
        return Err(AppError::Knowledge(format!(
            "Unexpected embedding dimensions: got {}, expected {}",
            embedding.len(),
            expected
        )));
    }
    Ok(())
}

/// Create an embedding provider based on configuration.
pub fn create_provider(
    config: &EmbeddingConfig,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockProvider::new(config.dimensions))),

        "ollama" => Ok(Arc::new(OllamaProvider::new(config)?)),

        "gemini" => {
            let key = api_key.ok_or_else(|| {
                AppError::Config("Gemini embeddings require an API key".to_string())
            })?;
            Ok(Arc::new(GeminiProvider::new(config, key)?))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, gemini, mock",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: provider.to_string(),
            ..EmbeddingConfig::default()
        }
    }

    #[test]
    fn test_create_mock_provider() {
        let provider = create_provider(&config("mock"), None).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.model_name(), "trigram-v1");
        assert_eq!(provider.dimensions(), 768);
    }

    #[test]
    fn test_create_ollama_provider_is_lazy() {
        let provider = create_provider(&config("ollama"), None).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[test]
    fn test_gemini_requires_key() {
        let err = create_provider(&config("gemini"), None).unwrap_err();
        assert!(err.is_fatal());
        assert!(create_provider(&config("gemini"), Some("key")).is_ok());
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider(&config("unknown"), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[test]
    fn test_task_types() {
        assert_eq!(EmbeddingTask::Document.as_task_type(), "RETRIEVAL_DOCUMENT");
        assert_eq!(EmbeddingTask::Query.as_task_type(), "RETRIEVAL_QUERY");
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(3, &[0.0, 1.0, 0.0]).is_ok());
        assert!(check_dimensions(4, &[0.0, 1.0, 0.0]).is_err());
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&config("mock"), None).unwrap();
        let embedding = provider
            .embed("test text", EmbeddingTask::Query)
            .await
            .unwrap();
        assert_eq!(embedding.len(), 768);
    }
}
