//! LLM provider factory.
//!
//! Builds a client from a provider name, resolving endpoints and secrets
//! from the application configuration.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, MockClient, OllamaClient};
use crate::types::{ProviderType, DEFAULT_OLLAMA_URL};
use mentor_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "gemini", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required by hosted providers)
///
/// # Errors
/// Returns a configuration error if the provider is unknown or a
/// required API key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        ProviderType::Gemini => {
            let key = api_key.ok_or_else(|| {
                AppError::Config("Gemini provider requires API key".to_string())
            })?;
            let client = match endpoint {
                Some(url) => GeminiClient::with_base_url(url, key),
                None => GeminiClient::new(key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::new())),
    }
}

/// Create the client for the configured active provider.
pub fn create_client_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let provider = config.provider.as_str();
    let endpoint = config.resolve_endpoint(provider);
    let api_key = config.resolve_api_key(provider);

    tracing::debug!(provider, endpoint = ?endpoint, "Creating LLM client");

    if let (Some(ProviderType::Ollama), Some(secs)) =
        (ProviderType::parse(provider), config.timeout_secs(provider))
    {
        let base_url = endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
        let client = OllamaClient::with_base_url(base_url).with_timeout(Duration::from_secs(secs))?;
        return Ok(Arc::new(client));
    }

    create_client(provider, endpoint.as_deref(), api_key.as_deref())
}
