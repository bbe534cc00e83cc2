//! Routing strategies: which responders should answer a message.

pub mod keyword;
pub mod llm;

pub use keyword::KeywordRouter;
pub use llm::LlmRouter;

use crate::responder::ResponderInfo;
use mentor_core::{AppError, AppResult};

/// Chooses responders for a message.
///
/// Returns responder ids; ids not present in `responders` are ignored by
/// the caller. An empty selection means "no expertise".
#[async_trait::async_trait]
pub trait RoutingStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn route(&self, query: &str, responders: &[ResponderInfo]) -> AppResult<Vec<String>>;
}

/// Routing strategy names accepted on the command line.
pub const ROUTER_NAMES: [&str; 2] = ["llm", "keyword"];

/// Validate a router name.
pub fn parse_router_name(name: &str) -> AppResult<&'static str> {
    ROUTER_NAMES
        .iter()
        .find(|n| n.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| {
            AppError::Config(format!(
                "Unknown router '{}'. Supported routers: {}",
                name,
                ROUTER_NAMES.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_router_name() {
        assert_eq!(parse_router_name("LLM").unwrap(), "llm");
        assert_eq!(parse_router_name("keyword").unwrap(), "keyword");
        assert!(parse_router_name("random").unwrap_err().is_fatal());
    }
}
