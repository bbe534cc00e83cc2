//! Offline mock provider.
//!
//! Replies come from a scripted queue when one is set, otherwise the prompt
//! is echoed back. JSON-mode requests without a script get a neutral
//! verdict object so judge and router code paths can run offline.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
use mentor_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;

const NEUTRAL_VERDICT: &str = r#"{"score": 0.5, "reasoning": "mock judge", "useful": true}"#;

/// Deterministic in-process LLM client.
#[derive(Default)]
pub struct MockClient {
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies returned in order before falling back to echo.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Ok(reply.into()));
        }
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, message: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(AppError::Llm(message.into())));
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self, request: &LlmRequest) -> AppResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let scripted = self
            .replies
            .lock()
            .map_err(|_| AppError::Llm("Mock reply queue poisoned".to_string()))?
            .pop_front();

        match scripted {
            Some(reply) => reply,
            None if request.json_response => Ok(NEUTRAL_VERDICT.to_string()),
            None => Ok(format!("[mock] {}", request.prompt)),
        }
    }
}

fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(model = %request.model, "Mock completion");
        let content = self.next_reply(request)?;

        Ok(LlmResponse {
            usage: LlmUsage::new(word_count(&request.prompt), word_count(&content)),
            content,
            model: request.model.clone(),
            done: true,
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        let content = self.next_reply(request)?;
        let model = request.model.clone();
        let usage = LlmUsage::new(word_count(&request.prompt), word_count(&content));

        let mut chunks: Vec<AppResult<LlmStreamChunk>> = content
            .split_inclusive(' ')
            .map(|piece| {
                Ok(LlmStreamChunk {
                    content: piece.to_string(),
                    model: model.clone(),
                    done: false,
                    usage: None,
                })
            })
            .collect();
        chunks.push(Ok(LlmStreamChunk {
            content: String::new(),
            model,
            done: true,
            usage: Some(usage),
        }));

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
