//! Teacher's assistant: specialists, routing strategies and the
//! orchestrator that ties them together.
//!
//! # Example
//! ```no_run
//! use mentor_agents::{catalog, KeywordRouter, Orchestrator};
//! use mentor_llm::MockClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockClient::new());
//! let orchestrator = Orchestrator::new(
//!     Arc::new(KeywordRouter::with_default_rules()),
//!     catalog::general(llm.clone(), "mock-echo"),
//! )
//! .with_responders(catalog::specialists(llm, "mock-echo"));
//!
//! let reply = orchestrator.handle("What is 2 + 2?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod orchestrator;
pub mod responder;
pub mod responders;
pub mod routing;

pub use orchestrator::{OrchestratedReply, Orchestrator, RoutedReply, TurnMetrics};
pub use responder::{Responder, ResponderInfo};
pub use responders::{LlmResponder, ResponderProfile, TodayResponder};
pub use routing::{parse_router_name, KeywordRouter, LlmRouter, RoutingStrategy, ROUTER_NAMES};

use mentor_core::AppResult;
use mentor_llm::LlmClient;
use std::sync::Arc;

/// Build the full teaching assistant with the named routing strategy.
pub fn teaching_assistant(
    router: &str,
    llm: Arc<dyn LlmClient>,
    model: &str,
) -> AppResult<Orchestrator> {
    let strategy: Arc<dyn RoutingStrategy> = match parse_router_name(router)? {
        "keyword" => Arc::new(KeywordRouter::with_default_rules()),
        _ => Arc::new(LlmRouter::new(llm.clone(), model)),
    };

    Ok(
        Orchestrator::new(strategy, catalog::general(llm.clone(), model))
            .with_responders(catalog::specialists(llm, model)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_llm::MockClient;

    #[tokio::test]
    async fn test_keyword_assistant_end_to_end() {
        let llm = Arc::new(MockClient::with_replies(["4"]));
        let assistant = teaching_assistant("keyword", llm.clone(), "mock-echo").unwrap();

        let reply = assistant.handle("What is 2 + 2?").await.unwrap();
        assert_eq!(reply.text, "Routed to Math Assistant\n\n4");
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_llm_assistant_falls_back_on_prose() {
        let llm = Arc::new(MockClient::with_replies([
            "I think a historian should answer.",
            "Leonardo da Vinci.",
        ]));
        let assistant = teaching_assistant("llm", llm, "mock-echo").unwrap();

        let reply = assistant.handle("Who painted the Mona Lisa?").await.unwrap();
        assert!(reply.metrics.used_fallback);
        assert_eq!(reply.text, "Routed to General Assistant\n\nLeonardo da Vinci.");
    }

    #[test]
    fn test_unknown_router_rejected() {
        let llm = Arc::new(MockClient::new());
        assert!(teaching_assistant("dice", llm, "m").is_err());
    }
}
