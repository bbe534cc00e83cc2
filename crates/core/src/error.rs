//! Error types for the Mentor workshop tools.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! LLM, knowledge, prompt, agent and evaluation failures.

use thiserror::Error;

/// Unified error type for the Mentor workspace.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing API key, unknown provider, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector store, embedding and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Orchestrator and responder errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Evaluation harness errors
    #[error("Evaluation error: {0}")]
    Eval(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error should stop the process rather than a single turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Prompt(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::Config("missing key".to_string()).is_fatal());
        assert!(AppError::Prompt("missing template".to_string()).is_fatal());
        assert!(!AppError::Llm("timeout".to_string()).is_fatal());
        assert!(!AppError::Knowledge("search failed".to_string()).is_fatal());
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Serialization(_)));
    }
}
