//! Assist command handler.
//!
//! The teaching assistant: each question is routed to one or more
//! specialist responders, or to the general assistant when none fits.

use super::{read_input, settle_turn, stdin_lines, Turn};
use clap::Args;
use mentor_agents::{teaching_assistant, OrchestratedReply, Orchestrator, ROUTER_NAMES};
use mentor_core::{config::AppConfig, AppError, AppResult};
use mentor_llm::{create_client_from_config, LlmClient};

/// Teaching assistant that routes questions to specialists
#[derive(Args, Debug)]
pub struct AssistCommand {
    /// Answer one question and exit
    #[arg(short, long)]
    pub query: Option<String>,

    /// Routing strategy
    #[arg(long, default_value = "llm", value_parser = clap::builder::PossibleValuesParser::new(ROUTER_NAMES))]
    pub router: String,

    /// Print routing metrics as JSON after each answer
    #[arg(long)]
    pub metrics: bool,
}

/// Setup help printed when the backend cannot be reached.
pub fn backend_help(provider: &str, model: &str) -> String {
    match provider {
        "ollama" => format!(
            "Ollama is not reachable. Start it and pull the model:\n  ollama serve\n  ollama pull {}",
            model
        ),
        "gemini" => "Gemini is not reachable. Check the API key and network access.".to_string(),
        other => format!("Provider '{}' is not reachable.", other),
    }
}

impl AssistCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing assist command with router '{}'", self.router);

        let llm = create_client_from_config(config)?;
        check_backend(llm.as_ref(), config).await?;

        let assistant = teaching_assistant(&self.router, llm, &config.model)?;

        if let Some(ref query) = self.query {
            let reply = assistant.handle(query).await?;
            println!("{}", self.render_reply(&reply)?);
            return Ok(());
        }

        self.repl(&assistant).await
    }

    async fn repl(&self, assistant: &Orchestrator) -> AppResult<()> {
        println!("\nTeacher's Assistant\n");
        println!("Ask a question in any subject area, and I'll route it to the appropriate specialist.");
        println!("Type 'exit' to quit.");

        let mut lines = stdin_lines();
        while let Some(line) = read_input(&mut lines, "\n> ").await? {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                break;
            }

            println!("{}", self.assist_turn(assistant, input).await?);
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Handle one question and render what the REPL prints for it.
    async fn assist_turn(&self, assistant: &Orchestrator, input: &str) -> AppResult<String> {
        match settle_turn(assistant.handle(input).await)? {
            Turn::Done(reply) => self.render_reply(&reply),
            Turn::Failed(e) => {
                tracing::warn!("Assist turn failed: {}", e);
                Ok(format!(
                    "\nAn error occurred: {}\nPlease try asking a different question.",
                    e
                ))
            }
        }
    }

    fn render_reply(&self, reply: &OrchestratedReply) -> AppResult<String> {
        let mut out = format!("\n{}", reply.text);
        if self.metrics {
            out.push('\n');
            out.push_str(&serde_json::to_string_pretty(&reply.metrics)?);
        }
        Ok(out)
    }
}

async fn check_backend(llm: &dyn LlmClient, config: &AppConfig) -> AppResult<()> {
    if let Err(e) = llm.health_check().await {
        eprintln!("{}", backend_help(&config.provider, &config.model));
        return Err(AppError::Config(format!(
            "LLM backend '{}' is not available: {}",
            config.provider, e
        )));
    }
    Ok(())
}
