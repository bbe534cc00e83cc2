//! Responders backed by a single LLM call.

use crate::responder::Responder;
use mentor_core::AppResult;
use mentor_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Fixed text that defines one LLM-backed specialist.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    /// Sentence placed before the user's message
    pub instruction: &'static str,
    /// Reply used when the model returns nothing
    pub apology: &'static str,
    /// Domain named in error replies ("Error processing your <domain> query")
    pub domain: &'static str,
    /// Words that select this responder under keyword routing
    pub keywords: &'static [&'static str],
}

/// A specialist that forwards the wrapped message to the LLM.
///
/// Model failures do not propagate: they become an error reply so the rest
/// of an orchestrated turn still runs.
pub struct LlmResponder {
    profile: ResponderProfile,
    llm: Arc<dyn LlmClient>,
    model: String,
    temperature: Option<f32>,
}

impl LlmResponder {
    pub fn new(profile: ResponderProfile, llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            profile,
            llm,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn profile(&self) -> &ResponderProfile {
        &self.profile
    }

    fn build_request(&self, query: &str) -> LlmRequest {
        let prompt = format!("{} {}", self.profile.instruction, query);
        let request = LlmRequest::new(prompt, &self.model).with_system(self.profile.system_prompt);
        match self.temperature {
            Some(temperature) => request.with_temperature(temperature),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl Responder for LlmResponder {
    fn id(&self) -> &str {
        self.profile.id
    }

    fn name(&self) -> &str {
        self.profile.name
    }

    fn description(&self) -> &str {
        self.profile.description
    }

    async fn respond(&self, query: &str) -> AppResult<String> {
        tracing::info!("Routed to {}", self.profile.name);

        match self.llm.complete(&self.build_request(query)).await {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::warn!("{} returned an empty reply", self.profile.name);
                Ok(self.profile.apology.to_string())
            }
            Ok(response) => Ok(response.content),
            Err(e) => {
                tracing::warn!("{} failed: {}", self.profile.name, e);
                Ok(format!(
                    "Error processing your {} query: {}",
                    self.profile.domain, e
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MATH;
    use mentor_llm::MockClient;

    #[tokio::test]
    async fn test_reply_is_returned_verbatim() {
        let llm = Arc::new(MockClient::with_replies(["x = 4"]));
        let responder = LlmResponder::new(MATH, llm.clone(), "llama3.2:3b");

        assert_eq!(responder.respond("Solve 2x = 8").await.unwrap(), "x = 4");

        let request = &llm.requests()[0];
        assert_eq!(request.system.as_deref(), Some(MATH.system_prompt));
        assert!(request.prompt.starts_with(MATH.instruction));
        assert!(request.prompt.ends_with("Solve 2x = 8"));
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_apology() {
        let llm = Arc::new(MockClient::with_replies(["   "]));
        let responder = LlmResponder::new(MATH, llm, "m");

        assert_eq!(responder.respond("2+2").await.unwrap(), MATH.apology);
    }

    #[tokio::test]
    async fn test_llm_error_becomes_reply() {
        let llm = MockClient::new();
        llm.push_error("connection refused");
        let responder = LlmResponder::new(MATH, Arc::new(llm), "m");

        let reply = responder.respond("2+2").await.unwrap();
        assert!(reply.starts_with("Error processing your mathematical query:"));
        assert!(reply.contains("connection refused"));
    }
}
