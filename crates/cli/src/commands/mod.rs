//! Command handlers for the Mentor CLI.

pub mod ask;
pub mod assist;
pub mod chat;
pub mod eval;
pub mod ingest;

pub use ask::AskCommand;
pub use assist::AssistCommand;
pub use chat::ChatCommand;
pub use eval::EvalCommand;
pub use ingest::IngestCommand;

use mentor_core::{config::AppConfig, AppError, AppResult};
use mentor_knowledge::{
    create_provider_from_config, ingestor_from_config, open_store, retriever_from_config,
    EmbeddingProvider, IngestStats, RagPipeline, VectorStore, SAMPLE_DOCUMENTS,
};
use mentor_llm::create_client_from_config;
use mentor_prompt::{list_system_prompt_versions, load_system_prompt, load_template};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Optional template rendering `{{question}}` and `{{context}}`.
const RAG_TEMPLATE: &str = "rag_prompt";

/// Collection and prompt choices shared by the RAG commands.
#[derive(Debug, Default)]
pub struct PipelineOptions {
    pub collection: Option<String>,
    pub reingest: bool,
    pub top_k: Option<usize>,
    pub prompt_version: Option<String>,
    pub docs: Vec<PathBuf>,
}

/// Make sure the collection exists, ingesting documents when needed.
///
/// Explicit `docs` must exist; configured paths that are missing are
/// ignored. With no documents at all the built-in sample facts are used.
pub async fn prepare_collection(
    config: &AppConfig,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: &str,
    docs: &[PathBuf],
    reingest: bool,
) -> AppResult<Option<IngestStats>> {
    let docs: Vec<PathBuf> = if docs.is_empty() {
        config
            .document_paths()
            .into_iter()
            .filter(|p| {
                let exists = p.exists();
                if !exists {
                    tracing::debug!("Configured document path {:?} not found", p);
                }
                exists
            })
            .collect()
    } else {
        docs.to_vec()
    };

    let ingestor = ingestor_from_config(config, store.clone(), embedder);
    if !docs.is_empty() {
        return ingestor.ensure_collection(collection, &docs, reingest).await;
    }

    if !reingest && store.has_collection(collection)? {
        return Ok(None);
    }

    tracing::info!("No documents configured, ingesting sample documents");
    ingestor
        .ingest_texts(collection, SAMPLE_DOCUMENTS)
        .await
        .map(Some)
}

/// Build the RAG pipeline for the configured provider and collection.
///
/// Prompts are loaded before any ingestion so a missing version fails
/// before external embedding calls are made.
pub async fn build_pipeline(config: &AppConfig, options: &PipelineOptions) -> AppResult<RagPipeline> {
    let version = options
        .prompt_version
        .as_deref()
        .unwrap_or(&config.prompts.version);
    let prompts_dir = config.prompts_dir();
    let system_prompt = load_system_prompt(&prompts_dir, version).map_err(|e| {
        let available = list_system_prompt_versions(&prompts_dir).unwrap_or_default();
        if available.is_empty() {
            e
        } else {
            AppError::Prompt(format!("{}. Available versions: {}", e, available.join(", ")))
        }
    })?;
    let template = if prompts_dir.join(format!("{}.txt", RAG_TEMPLATE)).is_file() {
        Some(load_template(&prompts_dir, RAG_TEMPLATE)?)
    } else {
        None
    };

    let collection = options
        .collection
        .clone()
        .unwrap_or_else(|| config.knowledge.collection.clone());

    let store = open_store(config)?;
    let embedder = create_provider_from_config(config)?;

    if let Some(stats) = prepare_collection(
        config,
        store.clone(),
        embedder.clone(),
        &collection,
        &options.docs,
        options.reingest,
    )
    .await?
    {
        tracing::info!(
            "Ingested {} chunks from {} documents into '{}'",
            stats.chunks_count,
            stats.documents_count,
            stats.collection
        );
    }

    let mut retriever = retriever_from_config(config, store, embedder).with_collection(collection);
    if let Some(top_k) = options.top_k {
        retriever = retriever.with_top_k(top_k);
    }

    let llm = create_client_from_config(config)?;
    let mut pipeline =
        RagPipeline::new(retriever, llm, config.model.clone()).with_system_prompt(system_prompt);
    if let Some(template) = template {
        pipeline = pipeline.with_template(template);
    }

    Ok(pipeline)
}

/// Line reader over stdin for the interactive commands.
pub type InputLines = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Print `prompt` and read one line. `None` at end of input.
pub async fn read_input(lines: &mut InputLines, prompt: &str) -> AppResult<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// A REPL turn after fatal errors have been split off.
#[derive(Debug)]
pub enum Turn<T> {
    Done(T),
    Failed(AppError),
}

/// Fatal errors end the REPL; any other failure is reported and the loop goes on.
pub fn settle_turn<T>(result: AppResult<T>) -> AppResult<Turn<T>> {
    match result {
        Ok(value) => Ok(Turn::Done(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => Ok(Turn::Failed(e)),
    }
}
