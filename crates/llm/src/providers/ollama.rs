//! Ollama LLM provider implementation.
//!
//! Uses the chat endpoint so conversation history is passed as messages.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
use crate::providers::{api_error, line_stream};
use crate::types::DEFAULT_OLLAMA_URL;
use futures::StreamExt;
use mentor_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Default, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama chat response format (also used for each streamed line).
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    #[serde(default)]
    message: Option<OllamaMessage>,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaChatResponse {
    fn usage(&self) -> LlmUsage {
        LlmUsage::new(
            self.prompt_eval_count.unwrap_or(0),
            self.eval_count.unwrap_or(0),
        )
    }

    fn into_text(self) -> String {
        self.message.map(|m| m.content).unwrap_or_default()
    }
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a request timeout for every call.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert LlmRequest to Ollama format.
    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaChatRequest {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        if let Some(ref system) = request.system {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.conversation().into_iter().map(to_ollama_message));

        OllamaChatRequest {
            model: request.model.clone(),
            messages,
            stream: request.stream,
            format: request.json_response.then(|| "json".to_string()),
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    async fn post_chat(&self, body: &OllamaChatRequest) -> AppResult<reqwest::Response> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            return Err(api_error("Ollama", response).await);
        }

        Ok(response)
    }
}

fn to_ollama_message(message: ChatMessage) -> OllamaMessage {
    OllamaMessage {
        role: message.role.as_str().to_string(),
        content: message.content,
    }
}

fn parse_stream_line(line: &str) -> AppResult<LlmStreamChunk> {
    let parsed: OllamaChatResponse = serde_json::from_str(line)
        .map_err(|e| AppError::Llm(format!("Failed to parse chunk: {}", e)))?;

    let usage = parsed.done.then(|| parsed.usage());
    let model = parsed.model.clone();
    let done = parsed.done;

    Ok(LlmStreamChunk {
        content: parsed.into_text(),
        model,
        done,
        usage,
    })
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> AppResult<()> {
        let url = format!("{}/api/tags", self.base_url);
        tracing::debug!(%url, "Checking Ollama health");

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!(
                    "Ollama is not running or not accessible at {}: {}",
                    self.base_url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Llm(format!(
                "Ollama at {} answered health check with {}",
                self.base_url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let mut body = self.to_ollama_request(request);
        body.stream = false;

        let response = self.post_chat(&body).await?;

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::debug!("Response: {:?}", parsed);

        let usage = parsed.usage();
        let model = parsed.model.clone();
        let done = parsed.done;

        Ok(LlmResponse {
            content: parsed.into_text(),
            model,
            usage,
            done,
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        tracing::info!(model = %request.model, "Starting streaming request to Ollama");

        let mut body = self.to_ollama_request(request);
        body.stream = true;

        let response = self.post_chat(&body).await?;

        // Ollama sends newline-delimited JSON
        let stream = line_stream(response.bytes_stream())
            .map(|line| line.and_then(|line| parse_stream_line(&line)));

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url(), "http://localhost:11434");

        let custom = OllamaClient::with_base_url("http://gpu-box:11434/");
        assert_eq!(custom.base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_ollama_request_conversion() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("Hello", "llama3.2:3b")
            .with_system("You are a tutor.")
            .with_history(vec![
                ChatMessage::user("hi"),
                ChatMessage::assistant("hi there"),
            ])
            .with_temperature(0.2)
            .with_max_tokens(512)
            .with_json_response();

        let body = client.to_ollama_request(&request);
        assert_eq!(body.model, "llama3.2:3b");
        assert_eq!(body.messages.len(), 4);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[2].role, "assistant");
        assert_eq!(body.messages[3].content, "Hello");
        assert_eq!(body.format.as_deref(), Some("json"));
        assert_eq!(body.options.temperature, Some(0.2));
        assert_eq!(body.options.num_predict, Some(512));
    }

    #[test]
    fn test_parse_stream_line() {
        let partial = parse_stream_line(
            r#"{"model":"llama3.2:3b","message":{"role":"assistant","content":"Hel"},"done":false}"#,
        )
        .unwrap();
        assert_eq!(partial.content, "Hel");
        assert!(!partial.done);
        assert!(partial.usage.is_none());

        let last = parse_stream_line(
            r#"{"model":"llama3.2:3b","message":{"role":"assistant","content":""},"done":true,"prompt_eval_count":12,"eval_count":7}"#,
        )
        .unwrap();
        assert!(last.done);
        assert_eq!(last.usage, Some(LlmUsage::new(12, 7)));

        assert!(parse_stream_line("not json").is_err());
    }
}
