//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// A bounded span of source text stored as a retrievable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Stable identifier derived from source, position and content hash
    pub id: String,

    /// Source reference (file path or inline label)
    pub source: String,

    /// Position within source
    pub position: u32,

    /// Text content
    pub text: String,

    /// Enclosing markdown headings, outermost first
    #[serde(default)]
    pub heading_path: Vec<String>,

    /// SHA-256 of the text
    pub content_hash: String,
}

/// A chunk paired with its embedding, ready for storage.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// A stored chunk returned for a query, with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub chunk: DocumentChunk,

    /// Cosine similarity to the query embedding
    pub score: f32,
}

impl RetrievedPassage {
    pub fn text(&self) -> &str {
        &self.chunk.text
    }
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Collection written to
    pub collection: String,

    /// Number of documents processed
    pub documents_count: u32,

    /// Number of chunks stored
    pub chunks_count: u32,

    /// Total bytes read
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}

/// Statistics for a stored collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub name: String,
    pub dimension: usize,
    pub chunks_count: u32,
}
