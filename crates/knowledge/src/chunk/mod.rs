//! Text chunking.
//!
//! Two strategies are provided:
//! - [`MarkdownChunker`]: header-aware sections, paragraph and sentence
//!   fallbacks for oversized sections
//! - [`WindowChunker`]: fixed-size character windows with overlap
//!
//! Sizes are counted in characters, never bytes, so splits always land on
//! UTF-8 boundaries.

pub mod markdown;
mod metadata;
pub mod window;

pub use markdown::MarkdownChunker;
pub use metadata::{calculate_hash, chunk_id};
pub use window::WindowChunker;

use crate::types::DocumentChunk;

/// Chunk size and overlap, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Defaults for markdown documents.
    pub fn markdown() -> Self {
        Self::new(6000, 200)
    }

    /// Defaults for short inline documents.
    pub fn window() -> Self {
        Self::new(512, 50)
    }
}

/// A chunk body before identity is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkText {
    pub text: String,
    pub heading_path: Vec<String>,
}

impl ChunkText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading_path: Vec::new(),
        }
    }
}

/// A text splitting strategy.
pub trait Chunker: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Split text into chunk bodies, in document order.
    fn split(&self, text: &str) -> Vec<ChunkText>;

    /// Split text and assign stable ids and positions.
    fn chunk(&self, source: &str, text: &str) -> Vec<DocumentChunk> {
        let chunks: Vec<DocumentChunk> = self
            .split(text)
            .into_iter()
            .filter(|piece| !piece.text.trim().is_empty())
            .enumerate()
            .map(|(position, piece)| build_chunk(source, position as u32, piece))
            .collect();

        tracing::debug!(
            "Chunked {} into {} chunks using {}",
            source,
            chunks.len(),
            self.name()
        );

        chunks
    }
}

fn build_chunk(source: &str, position: u32, piece: ChunkText) -> DocumentChunk {
    let content_hash = calculate_hash(&piece.text);
    DocumentChunk {
        id: chunk_id(source, position, &content_hash),
        source: source.to_string(),
        position,
        text: piece.text,
        heading_path: piece.heading_path,
        content_hash,
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_assigns_positions_and_stable_ids() {
        let chunker = MarkdownChunker::default();
        let text = "# One\n\nAlpha.\n\n# Two\n\nBeta.";

        let first = chunker.chunk("doc.md", text);
        let second = chunker.chunk("doc.md", text);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].position, 0);
        assert_eq!(first[1].position, 1);
        assert_eq!(first, second);
        assert_ne!(first[0].id, first[1].id);
        assert_eq!(first[1].heading_path, vec!["# Two".to_string()]);
    }

    #[test]
    fn test_chunk_config_clamps_size() {
        assert_eq!(ChunkConfig::new(0, 0).chunk_size, 1);
        assert_eq!(ChunkConfig::markdown(), ChunkConfig::new(6000, 200));
        assert_eq!(ChunkConfig::window(), ChunkConfig::new(512, 50));
    }
}
