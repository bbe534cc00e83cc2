//! Prompt system for the Mentor workshop tools.
//!
//! This crate provides:
//! - Versioned system prompts (`prompts/system_prompt_<version>.txt`)
//! - Plain-text templates with `{{placeholder}}` variables
//! - Strict Handlebars rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_template};
pub use loader::{list_prompts, list_system_prompt_versions, load_system_prompt, load_template};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptTemplate};
