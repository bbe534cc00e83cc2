//! Ask command handler.
//!
//! One-shot RAG answer, streamed to stdout or printed as JSON.

use super::{build_pipeline, PipelineOptions};
use clap::Args;
use mentor_core::{config::AppConfig, AppError, AppResult};
use mentor_knowledge::{ChatSession, RagAnswer};
use std::io::Write;

/// Answer one question from the document collection
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Collection to query (default from config)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Number of passages to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// System prompt version
    #[arg(long)]
    pub prompt_version: Option<String>,

    /// Disable streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON document printed by `--json`.
pub fn answer_json(answer: &RagAnswer, config: &AppConfig) -> serde_json::Value {
    let passages: Vec<serde_json::Value> = answer
        .passages
        .iter()
        .map(|p| {
            serde_json::json!({
                "source": p.chunk.source,
                "score": p.score,
                "text": p.chunk.text,
            })
        })
        .collect();

    serde_json::json!({
        "answer": answer.text,
        "model": config.model,
        "provider": config.provider,
        "passages": passages,
        "usage": {
            "promptTokens": answer.usage.prompt_tokens,
            "completionTokens": answer.usage.completion_tokens,
            "totalTokens": answer.usage.total_tokens
        }
    })
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        if self.question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let options = PipelineOptions {
            collection: self.collection.clone(),
            top_k: self.top_k,
            prompt_version: self.prompt_version.clone(),
            ..PipelineOptions::default()
        };
        let pipeline = build_pipeline(config, &options).await?;
        let mut session = ChatSession::new();

        if self.json {
            let answer = pipeline.answer(&mut session, &self.question).await?;
            let json = serde_json::to_string_pretty(&answer_json(&answer, config))?;
            println!("{}", json);
            return Ok(());
        }

        let answer = if self.no_stream {
            let answer = pipeline.answer(&mut session, &self.question).await?;
            println!("{}", answer.text);
            answer
        } else {
            let answer = pipeline
                .answer_streaming(&mut session, &self.question, |piece| {
                    print!("{}", piece);
                    std::io::stdout().flush().ok();
                })
                .await?;
            println!();
            answer
        };

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            answer.usage.prompt_tokens,
            answer.usage.completion_tokens,
            answer.usage.total_tokens
        );
        for passage in &answer.passages {
            tracing::debug!("Source {} (score {:.3})", passage.chunk.source, passage.score);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_knowledge::{DocumentChunk, RetrievedPassage};
    use mentor_llm::LlmUsage;

    #[test]
    fn test_answer_json_shape() {
        let answer = RagAnswer {
            text: "Salt Lake City".to_string(),
            passages: vec![RetrievedPassage {
                chunk: DocumentChunk {
                    id: "x".to_string(),
                    source: "data/utah.md".to_string(),
                    position: 0,
                    text: "The capital of Utah is Salt Lake City.".to_string(),
                    heading_path: Vec::new(),
                    content_hash: String::new(),
                },
                score: 0.5,
            }],
            usage: LlmUsage::new(10, 3),
        };
        let config = AppConfig {
            provider: "mock".to_string(),
            model: "mock".to_string(),
            ..AppConfig::default()
        };

        let json = answer_json(&answer, &config);
        assert_eq!(json["answer"], "Salt Lake City");
        assert_eq!(json["provider"], "mock");
        assert_eq!(json["passages"][0]["source"], "data/utah.md");
        assert_eq!(json["usage"]["totalTokens"], 13);
    }
}
