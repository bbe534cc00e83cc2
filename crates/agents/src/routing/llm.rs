//! Routing by LLM judgement.

use super::RoutingStrategy;
use crate::responder::ResponderInfo;
use mentor_core::{AppError, AppResult};
use mentor_llm::{LlmClient, LlmRequest};
use serde_json::Value;
use std::sync::Arc;

const ORCHESTRATOR_PROMPT: &str = "You are TeachAssist, an educational orchestrator that decides which specialists should answer a student's message.

Decision protocol:
- Calculations or numbers: the math specialist
- Writing, literature or grammar: the English specialist
- Translation, only when the student explicitly asks for another language
- Programming, algorithms or computer science: the computer science specialist
- Multi-step questions may need several specialists; list each one once, they answer in a fixed order
- If no specialist fits, select none

Available specialists:";

const RESPONSE_FORMAT: &str = "Respond with only a JSON array of specialist ids, for example [\"math\"]. Use [] when none applies.";

/// Asks the LLM for a JSON array of responder ids.
pub struct LlmRouter {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl LlmRouter {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Orchestrator system prompt listing every responder.
    pub fn system_prompt(responders: &[ResponderInfo]) -> String {
        let listing: Vec<String> = responders
            .iter()
            .map(|r| format!("- {} ({}): {}", r.id, r.name, r.description))
            .collect();
        format!(
            "{}\n{}\n\n{}",
            ORCHESTRATOR_PROMPT,
            listing.join("\n"),
            RESPONSE_FORMAT
        )
    }
}

/// Extract responder ids from a router reply.
///
/// Accepts a bare array, an array embedded in prose, or an object holding
/// an array. Anything else yields no ids.
pub fn parse_selection(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    let value = serde_json::from_str::<Value>(trimmed).ok().or_else(|| {
        let start = trimmed.find('[')?;
        let end = trimmed.rfind(']')?;
        if end < start {
            return None;
        }
        serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
    });

    let array = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.into_iter().find_map(|(_, v)| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }) {
            Some(items) => items,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    array
        .into_iter()
        .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait::async_trait]
impl RoutingStrategy for LlmRouter {
    fn name(&self) -> &str {
        "llm"
    }

    async fn route(&self, query: &str, responders: &[ResponderInfo]) -> AppResult<Vec<String>> {
        let request = LlmRequest::new(query, &self.model)
            .with_system(Self::system_prompt(responders))
            .with_temperature(0.0);

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| AppError::Agent(format!("Failed to route message: {}", e)))?;
        let ids = parse_selection(&response.content);
        if ids.is_empty() {
            tracing::debug!("Router reply had no usable selection: {}", response.content);
        }

        let (known, unknown): (Vec<String>, Vec<String>) = ids
            .into_iter()
            .partition(|id| responders.iter().any(|r| &r.id == id));
        if !unknown.is_empty() {
            tracing::warn!("Router selected unknown responders: {:?}", unknown);
        }

        tracing::debug!("LLM routing selected {:?}", known);
        Ok(known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_llm::MockClient;

    fn infos() -> Vec<ResponderInfo> {
        ["math", "english", "general"]
            .iter()
            .map(|id| ResponderInfo {
                id: id.to_string(),
                name: format!("{} assistant", id),
                description: format!("{} questions", id),
            })
            .collect()
    }

    #[test]
    fn test_parse_selection_forms() {
        assert_eq!(parse_selection(r#"["math", "english"]"#), vec!["math", "english"]);
        assert_eq!(
            parse_selection("I'll use these: [\"math\"] because it is arithmetic."),
            vec!["math"]
        );
        assert_eq!(parse_selection(r#"{"responders": ["english"]}"#), vec!["english"]);
        assert!(parse_selection("[]").is_empty());
        assert!(parse_selection("the math one").is_empty());
        assert!(parse_selection("] nonsense [").is_empty());
        assert!(parse_selection(r#"[1, 2]"#).is_empty());
    }

    #[test]
    fn test_system_prompt_lists_responders() {
        let prompt = LlmRouter::system_prompt(&infos());
        assert!(prompt.contains("- math (math assistant): math questions"));
        assert!(prompt.contains("- general (general assistant)"));
        assert!(prompt.ends_with(RESPONSE_FORMAT));
        assert!(!prompt.contains("order they should run"));
        assert!(prompt.contains("they answer in a fixed order"));
    }

    #[tokio::test]
    async fn test_unknown_ids_dropped() {
        let llm = Arc::new(MockClient::with_replies([r#"["physics", "math"]"#]));
        let router = LlmRouter::new(llm.clone(), "llama3.2:3b");

        let selected = router.route("What is 2+2?", &infos()).await.unwrap();
        assert_eq!(selected, vec!["math"]);

        let request = &llm.requests()[0];
        assert_eq!(request.prompt, "What is 2+2?");
        assert_eq!(request.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_unparseable_reply_selects_nothing() {
        let llm = Arc::new(MockClient::with_replies(["Routing to the Math Agent"]));
        let router = LlmRouter::new(llm, "m");
        assert!(router.route("2+2", &infos()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let llm = MockClient::new();
        llm.push_error("model not found");
        let router = LlmRouter::new(Arc::new(llm), "m");
        let err = router.route("2+2", &infos()).await.unwrap_err();
        assert!(matches!(err, AppError::Agent(_)));
        assert!(err.to_string().contains("model not found"));
        assert!(!err.is_fatal());
    }
}
