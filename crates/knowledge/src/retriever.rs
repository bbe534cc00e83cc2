//! Query-time retrieval over a stored collection.

use crate::embeddings::{EmbeddingProvider, EmbeddingTask};
use crate::store::VectorStore;
use crate::types::RetrievedPassage;
use mentor_core::{AppError, AppResult};
use std::sync::Arc;

/// Embeds questions and returns the most similar stored passages.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
    top_k: usize,
    threshold: Option<f32>,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
            top_k: 5,
            threshold: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Drop passages scoring at or below `threshold`.
    pub fn with_threshold(mut self, threshold: Option<f32>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Top-k passages for `query`, best first.
    pub async fn retrieve(&self, query: &str) -> AppResult<Vec<RetrievedPassage>> {
        let query_embedding = self
            .embedder
            .embed(query, EmbeddingTask::Query)
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to embed query: {}", e)))?;

        let mut passages = self
            .store
            .search(&self.collection, &query_embedding, self.top_k)?;

        if let Some(first) = passages.first() {
            tracing::debug!(
                "Retrieved {} passages from '{}' (top score: {:.3})",
                passages.len(),
                self.collection,
                first.score
            );
        }

        if let Some(threshold) = self.threshold {
            passages.retain(|p| p.score > threshold);
            tracing::debug!(
                "{} passages above similarity threshold {:.2}",
                passages.len(),
                threshold
            );
        }

        Ok(passages)
    }
}
