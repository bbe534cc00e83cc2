//! Retrieval-augmented generation over a stored collection.

pub mod pipeline;
pub mod session;
pub mod types;

pub use pipeline::{RagPipeline, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use session::ChatSession;
pub use types::RagAnswer;
