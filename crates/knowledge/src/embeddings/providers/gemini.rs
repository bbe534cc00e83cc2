//! Gemini embedding provider.
//!
//! Uses `batchEmbedContents` with a task type and an output dimensionality
//! matching the collection.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::provider::{check_dimensions, EmbeddingProvider, EmbeddingTask};
use mentor_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

impl GeminiProvider {
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config(
                "Gemini embeddings require an API key".to_string(),
            ));
        }

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        })
    }

    fn build_batch<'a>(&self, texts: &'a [String], task: EmbeddingTask) -> BatchRequest<'a> {
        BatchRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text }],
                    },
                    task_type: task.as_task_type(),
                    output_dimensionality: self.dimensions,
                })
                .collect(),
        }
    }

    async fn embed_chunk(&self, texts: &[String], task: EmbeddingTask) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/models/{}:batchEmbedContents", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_batch(texts, task))
            .send()
            .await
            .map_err(|e| {
                AppError::Knowledge(format!("Failed to send embedding request to Gemini: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Knowledge(format!(
                "Gemini embedding error ({}): {}",
                status, error_text
            )));
        }

        let body: BatchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to parse Gemini response: {}", e)))?;

        if body.embeddings.len() != texts.len() {
            return Err(AppError::Knowledge(format!(
                "Gemini returned {} embeddings for {} texts",
                body.embeddings.len(),
                texts.len()
            )));
        }

        body.embeddings
            .into_iter()
            .map(|e| {
                if e.values.is_empty() {
                    return Err(AppError::Knowledge(
                        "Failed to generate embedding.".to_string(),
                    ));
                }
                check_dimensions(self.dimensions, &e.values)?;
                Ok(e.values)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String], task: EmbeddingTask) -> AppResult<Vec<Vec<f32>>> {
        tracing::debug!(
            "Embedding {} texts with {} ({})",
            texts.len(),
            self.model,
            task.as_task_type()
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.embed_chunk(batch, task).await?);
        }
        Ok(embeddings)
    }
}
