//! Mentor CLI
//!
//! Main entry point for the `mentor` command-line tool: a RAG chat over
//! local documents, a routed teaching assistant and an evaluation harness.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, AssistCommand, ChatCommand, EvalCommand, IngestCommand};
use mentor_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Mentor - RAG workshop tools with local-first retrieval
#[derive(Parser, Debug)]
#[command(name = "mentor")]
#[command(about = "RAG chat, routed teaching assistant and evaluation harness", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "MENTOR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(long, global = true, env = "MENTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (ollama, gemini, mock)
    #[arg(short, long, global = true, env = "MENTOR_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "MENTOR_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat grounded in the document collection
    Chat(ChatCommand),

    /// Answer one question from the document collection
    Ask(AskCommand),

    /// (Re)build the document collection
    Ingest(IngestCommand),

    /// Teaching assistant that routes questions to specialists
    Assist(AssistCommand),

    /// Score the pipeline against golden cases
    Eval(EvalCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Chat(_) => "chat",
            Commands::Ask(_) => "ask",
            Commands::Ingest(_) => "ingest",
            Commands::Assist(_) => "assist",
            Commands::Eval(_) => "eval",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Mentor CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;
    config.ensure_mentor_dir()?;

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Assist(cmd) => cmd.execute(&config).await,
        Commands::Eval(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
