//! Chunk identity helpers.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 hash of text.
pub fn calculate_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Deterministic chunk id from source, position and content hash.
///
/// Re-chunking an unchanged file yields the same ids.
pub fn chunk_id(source: &str, position: u32, content_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(position.to_le_bytes());
    hasher.update(content_hash.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_hash() {
        let text = "Hello, world!";
        let hash = calculate_hash(text);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_hash(text));
        assert_ne!(hash, calculate_hash("Different text"));
    }

    #[test]
    fn test_chunk_id_depends_on_every_part() {
        let hash = calculate_hash("body");
        let id = chunk_id("data/waml.md", 0, &hash);

        assert_eq!(id.len(), 32);
        assert_eq!(id, chunk_id("data/waml.md", 0, &hash));
        assert_ne!(id, chunk_id("data/waml.md", 1, &hash));
        assert_ne!(id, chunk_id("data/other.md", 0, &hash));
        assert_ne!(id, chunk_id("data/waml.md", 0, &calculate_hash("other")));
    }
}
