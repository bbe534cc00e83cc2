//! Vector storage for embedded chunks.
//!
//! Collections are named and carry a fixed embedding dimension. Search is an
//! exact cosine-similarity scan, which is plenty for workshop-sized corpora.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{CollectionStats, DocumentChunk, EmbeddedChunk, RetrievedPassage};
use mentor_core::{AppError, AppResult};

/// Trait for vector store backends.
///
/// Implementations must:
/// - reject inserts and queries whose dimension differs from the collection's
/// - return search results ordered by descending similarity
/// - return a `Config` error for collections that do not exist
pub trait VectorStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    fn has_collection(&self, name: &str) -> AppResult<bool>;

    /// Create an empty collection. Fails if it already exists.
    fn create_collection(&self, name: &str, dimension: usize) -> AppResult<()>;

    /// Remove a collection and its chunks. Missing collections are ignored.
    fn drop_collection(&self, name: &str) -> AppResult<()>;

    fn insert(&self, name: &str, chunks: &[EmbeddedChunk]) -> AppResult<()>;

    /// Top-k most similar chunks to the query embedding.
    fn search(&self, name: &str, query: &[f32], top_k: usize) -> AppResult<Vec<RetrievedPassage>>;

    fn count(&self, name: &str) -> AppResult<u32>;

    /// All stored chunks in insertion order.
    fn chunks(&self, name: &str) -> AppResult<Vec<DocumentChunk>>;

    fn stats(&self, name: &str) -> AppResult<CollectionStats>;
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score every candidate against the query and keep the best `top_k`.
pub(crate) fn rank<I>(query: &[f32], candidates: I, top_k: usize) -> Vec<RetrievedPassage>
where
    I: IntoIterator<Item = (DocumentChunk, Vec<f32>)>,
{
    let mut results: Vec<RetrievedPassage> = candidates
        .into_iter()
        .map(|(chunk, embedding)| RetrievedPassage {
            score: cosine_similarity(query, &embedding),
            chunk,
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(top_k);
    results
}

pub(crate) fn check_dimension(collection: &str, expected: usize, actual: usize) -> AppResult<()> {
    if expected != actual {
        return Err(AppError::Knowledge(format!(
            "Dimension mismatch for collection '{}': expected {}, got {}",
            collection, expected, actual
        )));
    }
    Ok(())
}

pub(crate) fn missing_collection(name: &str) -> AppError {
    AppError::Config(format!(
        "Collection '{}' does not exist. Run 'mentor ingest' first.",
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str) -> DocumentChunk {
        DocumentChunk {
            id: id.to_string(),
            source: "test".to_string(),
            position: 0,
            text: id.to_string(),
            heading_path: Vec::new(),
            content_hash: String::new(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let candidates = vec![
            (chunk("far"), vec![0.0, 1.0]),
            (chunk("near"), vec![1.0, 0.0]),
            (chunk("middle"), vec![1.0, 1.0]),
        ];

        let results = rank(&[1.0, 0.0], candidates, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "near");
        assert_eq!(results[1].chunk.id, "middle");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_missing_collection_is_config_error() {
        assert!(missing_collection("docs").is_fatal());
    }
}
