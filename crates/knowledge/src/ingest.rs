//! Document ingestion: load, chunk, embed, store.

use crate::chunk::{ChunkConfig, Chunker, MarkdownChunker, WindowChunker};
use crate::embeddings::{EmbeddingProvider, EmbeddingTask};
use crate::parser::{self, ContentType};
use crate::store::VectorStore;
use crate::types::{DocumentChunk, EmbeddedChunk, IngestStats};
use mentor_core::AppResult;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

const EMBED_BATCH_SIZE: usize = 100;

/// Facts used by the workshop's inline demo collection.
pub const SAMPLE_DOCUMENTS: &[&str] = &[
    "The capital of Utah is Salt Lake City.",
    "Salt Lake City is known for its proximity to the Great Salt Lake.",
    "The first governor of Utah was Blue Bayou.",
    "Brigham Young was a leader in the Latter-day Saint movement.",
    "The current governor of Utah is Spencer Cox.",
    "Utah is a state in the Western United States.",
];

/// Builds collections in a vector store from source documents.
pub struct Ingestor {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    markdown: MarkdownChunker,
    window: WindowChunker,
}

impl Ingestor {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            markdown: MarkdownChunker::default(),
            window: WindowChunker::default(),
        }
    }

    /// Override the markdown chunk size and overlap.
    pub fn with_chunk_config(mut self, config: ChunkConfig) -> Self {
        self.markdown = MarkdownChunker::new(config);
        self
    }

    /// Ingest into `collection` only when it is missing or `reingest` is set.
    ///
    /// Returns `None` when the existing collection was reused.
    pub async fn ensure_collection(
        &self,
        collection: &str,
        paths: &[PathBuf],
        reingest: bool,
    ) -> AppResult<Option<IngestStats>> {
        if !reingest && self.store.has_collection(collection)? {
            tracing::info!(
                "Using existing collection '{}' ({} chunks)",
                collection,
                self.store.count(collection)?
            );
            return Ok(None);
        }

        self.ingest_paths(collection, paths).await.map(Some)
    }

    /// Drop and rebuild `collection` from files and directories.
    pub async fn ingest_paths(&self, collection: &str, paths: &[PathBuf]) -> AppResult<IngestStats> {
        let start = Instant::now();
        tracing::info!("Ingesting {} path(s) into '{}'", paths.len(), collection);

        let documents = parser::collect_documents(paths)?;

        let mut chunks = Vec::new();
        let mut stats = IngestStats {
            collection: collection.to_string(),
            ..IngestStats::default()
        };

        for path in &documents {
            let text = match parser::load_document(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            let source = path.display().to_string();
            let document_chunks = match ContentType::from_path(path) {
                ContentType::Markdown => self.markdown.chunk(&source, &text),
                _ => self.window.chunk(&source, &text),
            };

            stats.documents_count += 1;
            stats.bytes_processed += text.len() as u64;
            chunks.extend(document_chunks);
        }

        self.rebuild(collection, chunks, &mut stats).await?;
        stats.duration_secs = start.elapsed().as_secs_f64();

        tracing::info!(
            "Ingest completed: {} documents, {} chunks, {} bytes in {:.2}s",
            stats.documents_count,
            stats.chunks_count,
            stats.bytes_processed,
            stats.duration_secs
        );
        Ok(stats)
    }

    /// Drop and rebuild `collection` from inline texts, one source per text.
    pub async fn ingest_texts(&self, collection: &str, texts: &[&str]) -> AppResult<IngestStats> {
        let start = Instant::now();
        let mut stats = IngestStats {
            collection: collection.to_string(),
            ..IngestStats::default()
        };

        let mut chunks = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            chunks.extend(self.window.chunk(&format!("sample-{}", i), text));
            stats.documents_count += 1;
            stats.bytes_processed += text.len() as u64;
        }

        self.rebuild(collection, chunks, &mut stats).await?;
        stats.duration_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }

    /// Drop, recreate and fill `collection`.
    ///
    /// A failure part way through drops the collection again, so a later
    /// `ensure_collection` rebuilds instead of reusing partial contents.
    async fn rebuild(
        &self,
        collection: &str,
        chunks: Vec<DocumentChunk>,
        stats: &mut IngestStats,
    ) -> AppResult<()> {
        self.store.drop_collection(collection)?;
        self.store
            .create_collection(collection, self.embedder.dimensions())?;

        if let Err(e) = self.fill(collection, &chunks, stats).await {
            tracing::warn!(
                "Ingest into '{}' failed after {} of {} chunks, dropping it: {}",
                collection,
                stats.chunks_count,
                chunks.len(),
                e
            );
            stats.chunks_count = 0;
            self.store.drop_collection(collection)?;
            return Err(e);
        }

        Ok(())
    }

    async fn fill(
        &self,
        collection: &str,
        chunks: &[DocumentChunk],
        stats: &mut IngestStats,
    ) -> AppResult<()> {
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self
                .embedder
                .embed_batch(&texts, EmbeddingTask::Document)
                .await?;

            let embedded: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
                .collect();

            self.store.insert(collection, &embedded)?;
            stats.chunks_count += embedded.len() as u32;
            tracing::debug!("Stored {} / {} chunks", stats.chunks_count, chunks.len());
        }

        Ok(())
    }
}
