//! RAG response types.

use crate::types::RetrievedPassage;
use mentor_llm::LlmUsage;
use serde::{Deserialize, Serialize};

/// A generated answer with the passages it was conditioned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    pub text: String,

    /// Passages placed in the prompt, best first
    pub passages: Vec<RetrievedPassage>,

    #[serde(default)]
    pub usage: LlmUsage,
}

impl RagAnswer {
    /// Passage texts in rank order.
    pub fn context_texts(&self) -> Vec<String> {
        self.passages.iter().map(|p| p.text().to_string()).collect()
    }

    /// Highest similarity score, 0.0 when nothing was retrieved.
    pub fn max_score(&self) -> f32 {
        self.passages.first().map(|p| p.score).unwrap_or(0.0)
    }
}
