//! Ingest command handler.

use super::prepare_collection;
use clap::Args;
use mentor_core::{config::AppConfig, AppResult};
use mentor_knowledge::{create_provider_from_config, open_store, IngestStats};
use std::path::PathBuf;

/// (Re)build the document collection
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Collection to write (default from config)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Documents to ingest instead of the configured ones
    #[arg(long, num_args = 1..)]
    pub docs: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let collection = self
            .collection
            .clone()
            .unwrap_or_else(|| config.knowledge.collection.clone());
        tracing::info!("Executing ingest command for collection '{}'", collection);

        let store = open_store(config)?;
        let embedder = create_provider_from_config(config)?;
        let stats = prepare_collection(config, store, embedder, &collection, &self.docs, true)
            .await?
            .unwrap_or_else(|| IngestStats {
                collection: collection.clone(),
                ..IngestStats::default()
            });

        if self.json {
            let output = serde_json::json!({
                "collection": stats.collection,
                "documentsCount": stats.documents_count,
                "chunksCount": stats.chunks_count,
                "bytesProcessed": stats.bytes_processed,
                "durationSecs": stats.duration_secs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Ingested {} documents into '{}' ({} chunks, {} bytes) in {:.2}s",
                stats.documents_count,
                stats.collection,
                stats.chunks_count,
                stats.bytes_processed,
                stats.duration_secs
            );
        }

        Ok(())
    }
}
