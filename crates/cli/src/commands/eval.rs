//! Eval command handler.
//!
//! Answers every golden case with the RAG pipeline, scores it with the LLM
//! judge and writes the YAML summary.

use super::{build_pipeline, PipelineOptions};
use clap::Args;
use mentor_core::{config::AppConfig, AppError, AppResult};
use mentor_eval::{format_case, load_goldens, Harness, LlmJudge, DEFAULT_RESULTS_FILE};
use mentor_llm::create_client_from_config;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Score the pipeline against golden cases
#[derive(Args, Debug)]
pub struct EvalCommand {
    /// Golden cases, one JSON object per line
    #[arg(long, default_value = "goldens.jsonl")]
    pub goldens: PathBuf,

    /// System prompt version to evaluate
    #[arg(long)]
    pub prompt_version: Option<String>,

    /// Where to write the YAML summary
    #[arg(short, long, default_value = DEFAULT_RESULTS_FILE)]
    pub output: PathBuf,

    /// Collection to query (default from config)
    #[arg(short, long)]
    pub collection: Option<String>,
}

impl EvalCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let goldens_path = resolve(config, &self.goldens);
        tracing::info!("Executing eval command with goldens {:?}", goldens_path);

        let set = load_goldens(&goldens_path)?;
        for skipped in &set.skipped {
            eprintln!("Skipping golden line {}: {}", skipped.line, skipped.reason);
        }
        if set.cases.is_empty() {
            return Err(AppError::Eval(format!(
                "No valid test cases in {}",
                goldens_path.display()
            )));
        }

        let version = self
            .prompt_version
            .clone()
            .unwrap_or_else(|| config.prompts.version.clone());
        let options = PipelineOptions {
            collection: self.collection.clone(),
            prompt_version: Some(version.clone()),
            ..PipelineOptions::default()
        };
        let pipeline = build_pipeline(config, &options).await?;

        let judge = LlmJudge::new(create_client_from_config(config)?, config.model.clone());
        let harness = Harness::new(Arc::new(judge), version);

        println!("Starting evaluation with {} test cases...", set.cases.len());
        println!("{}", "-".repeat(60));

        let report = harness
            .run_with(&pipeline, &set.cases, &set.skipped, |result| {
                println!("{}", format_case(result));
            })
            .await;

        for skipped in &report.skipped {
            println!("Test Case {} skipped: {}", skipped.case, skipped.reason);
        }

        println!("{}", "=".repeat(60));
        println!("{}", report.format_totals());

        let output = resolve(config, &self.output);
        report.write_yaml(&output)?;
        println!("\nResults saved to {}", output.display());

        Ok(())
    }
}

fn resolve(config: &AppConfig, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.workspace.join(path)
    }
}
