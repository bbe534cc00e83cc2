//! Retrieval-augmented answering.

use crate::rag::session::ChatSession;
use crate::rag::types::RagAnswer;
use crate::retriever::Retriever;
use crate::types::RetrievedPassage;
use futures::StreamExt;
use mentor_core::AppResult;
use mentor_llm::{ChatMessage, LlmClient, LlmRequest, LlmUsage};
use mentor_prompt::{build_prompt, PromptTemplate};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Retrieves passages for a question and asks the LLM to answer with them.
///
/// With a template, the question and joined passages are rendered into the
/// user prompt as `{{question}}` and `{{context}}`. Without one, passages are
/// supplied as a `Relevant context:` assistant message ahead of the question.
pub struct RagPipeline {
    retriever: Retriever,
    llm: Arc<dyn LlmClient>,
    model: String,
    system_prompt: Option<String>,
    template: Option<PromptTemplate>,
    temperature: f32,
    max_tokens: u32,
}

impl RagPipeline {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            retriever,
            llm,
            model: model.into(),
            system_prompt: None,
            template: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `question` and record the exchange in the session.
    pub async fn answer(&self, session: &mut ChatSession, question: &str) -> AppResult<RagAnswer> {
        tracing::info!("Answering question in session {}", session.id);

        let passages = self.retriever.retrieve(question).await?;
        let request = self.build_request(session, question, &passages)?;

        let response = self.llm.complete(&request).await?;
        session.record_turn(question, response.content.clone());

        Ok(RagAnswer {
            text: response.content,
            passages,
            usage: response.usage,
        })
    }

    /// Like [`answer`](Self::answer), handing each streamed piece to `on_chunk`.
    pub async fn answer_streaming<F>(
        &self,
        session: &mut ChatSession,
        question: &str,
        mut on_chunk: F,
    ) -> AppResult<RagAnswer>
    where
        F: FnMut(&str) + Send,
    {
        let passages = self.retriever.retrieve(question).await?;
        let request = self.build_request(session, question, &passages)?.with_streaming();

        let mut stream = self.llm.stream(&request).await?;
        let mut text = String::new();
        let mut usage = LlmUsage::default();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.content.is_empty() {
                on_chunk(&chunk.content);
                text.push_str(&chunk.content);
            }
            if let Some(chunk_usage) = chunk.usage {
                usage = usage.add(&chunk_usage);
            }
            if chunk.done {
                break;
            }
        }

        session.record_turn(question, text.clone());
        Ok(RagAnswer {
            text,
            passages,
            usage,
        })
    }

    fn build_request(
        &self,
        session: &ChatSession,
        question: &str,
        passages: &[RetrievedPassage],
    ) -> AppResult<LlmRequest> {
        let context = passages
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut history = session.history().to_vec();
        let prompt = match &self.template {
            Some(template) => {
                let mut vars = HashMap::new();
                vars.insert("question".to_string(), question.to_string());
                vars.insert("context".to_string(), context);
                build_prompt(template, vars, None)?.user
            }
            None => {
                if !context.is_empty() {
                    history.push(ChatMessage::assistant(format!(
                        "Relevant context:\n{}",
                        context
                    )));
                }
                question.to_string()
            }
        };

        let mut request = LlmRequest::new(prompt, &self.model)
            .with_history(history)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        if let Some(system) = &self.system_prompt {
            request = request.with_system(system.clone());
        }

        Ok(request)
    }
}
