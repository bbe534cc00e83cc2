//! Fixed-window character chunking with overlap.

use super::{ChunkConfig, ChunkText, Chunker};

/// Splits text into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
#[derive(Debug, Clone)]
pub struct WindowChunker {
    config: ChunkConfig,
}

impl Default for WindowChunker {
    fn default() -> Self {
        Self::new(ChunkConfig::window())
    }
}

impl WindowChunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }
}

impl Chunker for WindowChunker {
    fn name(&self) -> &'static str {
        "window"
    }

    fn split(&self, text: &str) -> Vec<ChunkText> {
        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size;

        // Step forward by (chunk_size - overlap), at least one character
        let step = if size > self.config.overlap {
            size - self.config.overlap
        } else {
            size
        };

        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            pieces.push(ChunkText::plain(window.trim()));
            start += step;
        }

        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(size: usize, overlap: usize, text: &str) -> Vec<String> {
        WindowChunker::new(ChunkConfig::new(size, overlap))
            .split(text)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = split(512, 50, "The capital of Utah is Salt Lake City.");
        assert_eq!(chunks, vec!["The capital of Utah is Salt Lake City."]);
    }

    #[test]
    fn test_no_overlap() {
        let chunks = split(100, 0, &"a".repeat(300));
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_with_overlap() {
        let text: String = ('a'..='z').collect();
        let chunks = split(10, 4, &text);

        assert_eq!(chunks[0], "abcdefghij");
        assert_eq!(chunks[1], "ghijklmnop");
        assert_eq!(chunks.last().map(String::as_str), Some("yz"));
    }

    #[test]
    fn test_empty() {
        assert!(split(100, 10, "").is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let chunks = split(3, 1, "ÃéüÖ");
        assert_eq!(chunks, vec!["Ãéü", "üÖ"]);
    }
}
