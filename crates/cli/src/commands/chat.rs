//! Chat command handler.
//!
//! An interactive REPL over the RAG pipeline. Each turn retrieves passages
//! for the question and answers with the conversation so far.

use super::{build_pipeline, read_input, settle_turn, stdin_lines, PipelineOptions, Turn};
use clap::Args;
use mentor_core::{config::AppConfig, AppResult};
use mentor_knowledge::{ChatSession, RagPipeline, RetrievedPassage};
use std::path::PathBuf;

const BANNER: &str = "CLI Chat Client. Type 'quit' or 'exit' to end the chat.\nType 'verbose' to toggle verbose mode, and 'history' to view chat history.\n";

/// Interactive chat grounded in the document collection
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Collection to query (default from config)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Rebuild the collection before chatting
    #[arg(short, long)]
    pub reingest: bool,

    /// Start with retrieved passages shown
    #[arg(short, long)]
    pub show_passages: bool,

    /// System prompt version (prompts/system_prompt_<version>.txt)
    #[arg(long)]
    pub prompt_version: Option<String>,

    /// Number of passages to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Documents to ingest instead of the configured ones
    #[arg(long, num_args = 1..)]
    pub docs: Vec<PathBuf>,
}

/// Retrieved passages as printed in verbose mode.
pub fn format_passages(passages: &[RetrievedPassage]) -> String {
    let mut out = String::from("\n--- Retrieved Context Details ---\n");
    for passage in passages {
        out.push_str(&format!(
            "Similarity: {:.4}, Text: '{}'\n",
            passage.score,
            passage.text()
        ));
    }
    out.push_str("-------------------------------\n");
    out
}

/// The conversation so far, one `Role: text` line per message.
pub fn format_history(session: &ChatSession) -> String {
    let mut out = String::from("\n--- Chat History ---\n");
    for message in session.history() {
        let role = message.role.as_str();
        let mut label = role.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        out.push_str(&format!("{}: {}\n", label, message.content));
    }
    out.push_str("--------------------\n");
    out
}

/// Answer one question and render what the REPL prints for it.
pub async fn chat_turn(
    pipeline: &RagPipeline,
    session: &mut ChatSession,
    input: &str,
) -> AppResult<String> {
    match settle_turn(pipeline.answer(session, input).await)? {
        Turn::Done(answer) => {
            let mut out = String::new();
            if session.verbose {
                out.push_str(&format_passages(&answer.passages));
                out.push('\n');
            }
            out.push_str(&format!("Bot: {}", answer.text));
            Ok(out)
        }
        Turn::Failed(e) => {
            tracing::warn!("Chat turn failed: {}", e);
            Ok(format!("Error: {}", e))
        }
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let options = PipelineOptions {
            collection: self.collection.clone(),
            reingest: self.reingest,
            top_k: self.top_k,
            prompt_version: self.prompt_version.clone(),
            docs: self.docs.clone(),
        };
        let pipeline = build_pipeline(config, &options).await?;

        let mut session = ChatSession::new().with_verbose(self.show_passages);
        tracing::debug!("Chat session {} started", session.id);

        println!("{}", BANNER);
        let mut lines = stdin_lines();

        while let Some(line) = read_input(&mut lines, "You: ").await? {
            let input = line.trim();
            match input.to_lowercase().as_str() {
                "" => continue,
                "quit" | "exit" => break,
                "verbose" => {
                    let enabled = session.toggle_verbose();
                    println!(
                        "Verbose mode {}.",
                        if enabled { "enabled" } else { "disabled" }
                    );
                    continue;
                }
                "history" => {
                    println!("{}", format_history(&session));
                    continue;
                }
                _ => {}
            }

            println!("{}", chat_turn(&pipeline, &mut session, input).await?);
        }

        tracing::info!("Chat session ended after {} turns", session.turns());
        Ok(())
    }
}
