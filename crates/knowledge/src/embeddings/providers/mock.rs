//! Offline embedding provider based on hashed character trigrams.

use crate::embeddings::provider::{EmbeddingProvider, EmbeddingTask};
use mentor_core::AppResult;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "what", "who", "how", "does", "did",
];

/// Deterministic, content-aware embeddings for tests and offline runs.
///
/// Each significant word adds weight to the buckets of its character
/// trigrams and to one bucket for the whole word; the result is scaled to
/// unit length. Texts sharing vocabulary score a high cosine similarity.
/// The task is ignored.
#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
}

impl MockProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(&self, token: &str, seed: u64) -> usize {
        let hash = token
            .bytes()
            .fold(seed, |acc, b| acc.wrapping_mul(0x100_0000_01b3).wrapping_add(b as u64));
        (hash % self.dimensions as u64) as usize
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let mut frequencies: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        {
            *frequencies.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &frequencies {
            let weight = *freq as f32;
            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let trigram: String = trigram.iter().collect();
                embedding[self.bucket(&trigram, 0xcbf2_9ce4_8422_2325)] += weight.sqrt();
            }
            embedding[self.bucket(word, 17)] += weight;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|v| *v /= norm);
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _task: EmbeddingTask,
    ) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_unit_length_and_dimensions() {
        let provider = MockProvider::new(384);
        let embedding = provider
            .embed("hello world", EmbeddingTask::Document)
            .await
            .unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = MockProvider::new(128);
        let texts = vec!["deterministic test".to_string(); 2];
        let embeddings = provider
            .embed_batch(&texts, EmbeddingTask::Document)
            .await
            .unwrap();
        assert_eq!(embeddings[0], embeddings[1]);
    }

    #[tokio::test]
    async fn test_shared_vocabulary_scores_higher() {
        let provider = MockProvider::new(768);
        let query = provider
            .embed("Who was the first governor of Utah?", EmbeddingTask::Query)
            .await
            .unwrap();
        let related = provider
            .embed("The first governor of Utah was Blue Bayou.", EmbeddingTask::Document)
            .await
            .unwrap();
        let unrelated = provider
            .embed("Brigham Young was a leader.", EmbeddingTask::Document)
            .await
            .unwrap();

        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = MockProvider::new(64);
        let embedding = provider.embed("", EmbeddingTask::Query).await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_utf8_text() {
        let provider = MockProvider::new(64);
        let embedding = provider
            .embed("Gamedex é um aplicativo 🎮 brasileiro", EmbeddingTask::Document)
            .await
            .unwrap();
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }
}
