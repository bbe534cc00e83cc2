//! LLM-as-judge scoring.

use mentor_core::{AppError, AppResult};
use mentor_llm::{LlmClient, LlmRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const QUALITY_SYSTEM_PROMPT: &str = "You are an expert evaluator for question-answering systems. Your task is to assess how well a model's predicted answer addresses the given question compared to a reference answer. Consider both factual accuracy and completeness.";

/// Answer-quality judgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
struct UsefulnessVerdict {
    useful: bool,
}

/// Grades generated answers and retrieved passages.
#[async_trait::async_trait]
pub trait Judge: Send + Sync {
    /// Score in [0, 1] for `predicted` against `reference`.
    async fn answer_quality(
        &self,
        question: &str,
        reference: &str,
        predicted: &str,
    ) -> AppResult<QualityVerdict>;

    /// Whether `passage` helps arrive at `answer`.
    async fn is_useful(&self, question: &str, passage: &str, answer: &str) -> AppResult<bool>;
}

/// Judge backed by an LLM at temperature 0 with JSON output.
pub struct LlmJudge {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl LlmJudge {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    async fn ask<T: DeserializeOwned>(&self, prompt: String, system: Option<&str>) -> AppResult<T> {
        let mut request = LlmRequest::new(prompt, &self.model)
            .with_temperature(0.0)
            .with_json_response();
        if let Some(system) = system {
            request = request.with_system(system);
        }

        let response = self.llm.complete(&request).await?;
        if response.content.trim().is_empty() {
            return Err(AppError::Eval(
                "Failed to generate evaluation response.".to_string(),
            ));
        }
        parse_verdict(&response.content)
    }
}

pub fn quality_prompt(question: &str, reference: &str, predicted: &str) -> String {
    format!(
        "Evaluate the PREDICTED answer against the REFERENCE answer for the given QUESTION.\n\n\
         QUESTION: {}\n\n\
         REFERENCE: {}\n\n\
         PREDICTED: {}\n\n\
         Rate the PREDICTED answer using this scale:\n\
         - 0.0: Poor/Incorrect - Major factual errors, irrelevant, or completely misses the point\n\
         - 0.5: Partially Correct - Some relevant information but incomplete or contains minor errors\n\
         - 1.0: Good/Complete - Accurate, addresses the question well, consistent with reference\n\n\
         Provide your assessment as JSON with 'score' and 'reasoning' fields.",
        question, reference, predicted
    )
}

pub fn usefulness_prompt(question: &str, passage: &str, answer: &str) -> String {
    format!(
        "Given the following question, context chunk, and answer, determine if the context chunk \
         was useful in arriving at the given answer.\n\n\
         Question: {}\n\
         Context chunk: {}\n\
         Answer: {}\n\n\
         Respond with JSON containing 'useful' field (true/false).",
        question, passage, answer
    )
}

/// Parse a JSON verdict, tolerating prose or code fences around the object.
fn parse_verdict<T: DeserializeOwned>(text: &str) -> AppResult<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AppError::Eval(format!(
        "Failed to parse judge response: {}",
        trimmed
    )))
}

#[async_trait::async_trait]
impl Judge for LlmJudge {
    async fn answer_quality(
        &self,
        question: &str,
        reference: &str,
        predicted: &str,
    ) -> AppResult<QualityVerdict> {
        let verdict: QualityVerdict = self
            .ask(
                quality_prompt(question, reference, predicted),
                Some(QUALITY_SYSTEM_PROMPT),
            )
            .await?;

        if !(0.0..=1.0).contains(&verdict.score) {
            return Err(AppError::Eval(format!(
                "Judge score {} is outside [0, 1]",
                verdict.score
            )));
        }
        Ok(verdict)
    }

    async fn is_useful(&self, question: &str, passage: &str, answer: &str) -> AppResult<bool> {
        let verdict: UsefulnessVerdict = self
            .ask(usefulness_prompt(question, passage, answer), None)
            .await?;
        Ok(verdict.useful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_llm::MockClient;

    #[tokio::test]
    async fn test_quality_request_shape() {
        let llm = Arc::new(MockClient::with_replies([
            r#"{"score": 1.0, "reasoning": "matches"}"#,
        ]));
        let judge = LlmJudge::new(llm.clone(), "gemini-2.5-pro");

        let verdict = judge
            .answer_quality("Capital of Utah?", "Salt Lake City", "Salt Lake City.")
            .await
            .unwrap();
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.reasoning, "matches");

        let request = &llm.requests()[0];
        assert!(request.json_response);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.system.as_deref(), Some(QUALITY_SYSTEM_PROMPT));
        assert!(request.prompt.contains("REFERENCE: Salt Lake City\n"));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_error() {
        let llm = Arc::new(MockClient::with_replies([r#"{"score": 7, "reasoning": "?"}"#]));
        let judge = LlmJudge::new(llm, "m");
        assert!(judge.answer_quality("q", "a", "b").await.is_err());
    }

    #[tokio::test]
    async fn test_usefulness_parses_fenced_json() {
        let llm = Arc::new(MockClient::with_replies([
            "```json\n{\"useful\": false}\n```",
        ]));
        let judge = LlmJudge::new(llm.clone(), "m");

        assert!(!judge.is_useful("q", "chunk", "answer").await.unwrap());
        assert!(llm.requests()[0].system.is_none());
    }

    #[tokio::test]
    async fn test_garbage_is_error() {
        let llm = Arc::new(MockClient::with_replies(["I think it is fine"]));
        let judge = LlmJudge::new(llm, "m");
        assert!(judge.is_useful("q", "c", "a").await.is_err());
    }

    #[test]
    fn test_prompts() {
        let prompt = usefulness_prompt("Q?", "chunk text", "A.");
        assert!(prompt.contains("Question: Q?\nContext chunk: chunk text\nAnswer: A.\n\n"));
        assert!(prompt.ends_with("Respond with JSON containing 'useful' field (true/false)."));
    }
}
