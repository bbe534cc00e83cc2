//! LLM integration crate for the Mentor workshop tools.
//!
//! This crate provides a provider-agnostic abstraction for chat-style
//! completions against Large Language Models.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Gemini**: Hosted Generative Language API
//! - **Mock**: Offline echo / scripted replies
//!
//! # Example
//! ```no_run
//! use mentor_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2:3b");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{
    ChatMessage, ChatRole, LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk,
    LlmUsage,
};
pub use factory::{create_client, create_client_from_config};
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use types::ProviderType;
