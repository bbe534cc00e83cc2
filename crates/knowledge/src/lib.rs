//! Knowledge layer for the Mentor workshop tools.
//!
//! Provides local-first RAG: documents are chunked, embedded by an external
//! model, stored in a vector store (SQLite by default) and retrieved by
//! cosine similarity to condition LLM answers.

pub mod chunk;
pub mod embeddings;
pub mod ingest;
pub mod parser;
pub mod rag;
pub mod retriever;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chunk::{ChunkConfig, Chunker, MarkdownChunker, WindowChunker};
pub use embeddings::{
    create_provider, create_provider_from_config, EmbeddingConfig, EmbeddingProvider,
    EmbeddingTask,
};
pub use ingest::{Ingestor, SAMPLE_DOCUMENTS};
pub use rag::{ChatSession, RagAnswer, RagPipeline};
pub use retriever::Retriever;
pub use store::{cosine_similarity, MemoryStore, SqliteStore, VectorStore};
pub use types::{CollectionStats, DocumentChunk, EmbeddedChunk, IngestStats, RetrievedPassage};

use mentor_core::{AppConfig, AppResult};
use std::sync::Arc;

/// Open the on-disk vector store configured for the workspace.
pub fn open_store(config: &AppConfig) -> AppResult<Arc<dyn VectorStore>> {
    let path = config.vector_db_path();
    tracing::debug!("Opening vector store at {:?}", path);
    Ok(Arc::new(SqliteStore::open(&path)?))
}

/// Build an ingestor using the configured chunk sizes.
pub fn ingestor_from_config(
    config: &AppConfig,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Ingestor {
    Ingestor::new(store, embedder).with_chunk_config(ChunkConfig::new(
        config.knowledge.chunk_size,
        config.knowledge.chunk_overlap,
    ))
}

/// Build a retriever for the configured collection, top-k and threshold.
pub fn retriever_from_config(
    config: &AppConfig,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Retriever {
    Retriever::new(store, embedder, config.knowledge.collection.clone())
        .with_top_k(config.knowledge.top_k)
        .with_threshold(config.knowledge.similarity_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_wiring_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("data");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(
            docs.join("guide.md"),
            "# Guide\n\nThe deploy command publishes the site.\n\n# Testing\n\nRun the suite before merging.\n",
        )
        .unwrap();

        let mut config = AppConfig {
            workspace: temp_dir.path().to_path_buf(),
            provider: "mock".to_string(),
            ..AppConfig::default()
        };
        config.knowledge.documents = vec![docs];
        config.knowledge.embedding_dimensions = 64;
        config.knowledge.top_k = 1;

        let store = open_store(&config).unwrap();
        let embedder = create_provider_from_config(&config).unwrap();

        let stats = ingestor_from_config(&config, store.clone(), embedder.clone())
            .ensure_collection(
                &config.knowledge.collection,
                &config.document_paths(),
                false,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.chunks_count, 2);
        assert!(config.vector_db_path().exists());

        let passages = retriever_from_config(&config, store, embedder)
            .retrieve("How do I deploy the site?")
            .await
            .unwrap();
        assert_eq!(passages.len(), 1);
        assert!(passages[0].text().contains("deploy"));
    }
}
