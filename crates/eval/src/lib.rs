//! Evaluation of the RAG pipeline against golden cases.
//!
//! Each golden case is answered by an [`EvalTarget`], then scored for
//! answer quality by a [`Judge`] and for context precision from per-passage
//! usefulness verdicts. [`EvalReport`] aggregates the scores and writes the
//! YAML summary.

pub mod golden;
pub mod harness;
pub mod judge;
pub mod metrics;
pub mod report;

pub use golden::{load_goldens, parse_goldens, GoldenCase, GoldenSet, SkippedLine};
pub use harness::{EvalTarget, Harness};
pub use judge::{Judge, LlmJudge, QualityVerdict};
pub use metrics::{context_precision, matches_expected, mean};
pub use report::{format_case, CaseResult, EvalReport, SkippedCase};

/// Default file name for the YAML summary.
pub const DEFAULT_RESULTS_FILE: &str = "evaluation_results.yaml";

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_knowledge::{
        embeddings::providers::MockProvider, MemoryStore, RagPipeline, Retriever, VectorStore,
        SAMPLE_DOCUMENTS,
    };
    use mentor_knowledge::ingest::Ingestor;
    use mentor_llm::MockClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pipeline_evaluated_end_to_end() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryStore::new());
        let embedder = Arc::new(MockProvider::new(64));
        Ingestor::new(store.clone(), embedder.clone())
            .ingest_texts("utah", SAMPLE_DOCUMENTS)
            .await
            .unwrap();

        let retriever = Retriever::new(store, embedder, "utah").with_top_k(2);
        let llm = Arc::new(MockClient::with_replies(["Salt Lake City"]));
        let pipeline = RagPipeline::new(retriever, llm.clone(), "mock");

        let judge_llm = Arc::new(MockClient::with_replies([
            r#"{"score": 0.9, "reasoning": "matches"}"#,
        ]));
        let harness = Harness::new(Arc::new(LlmJudge::new(judge_llm, "mock")), "v1");

        let set = parse_goldens(
            r#"{"input": "What is the capital of Utah?", "expected": "Salt Lake City", "expected_passages": ["capital of Utah"]}
garbage"#,
        );
        let report = harness
            .run_with(&pipeline, &set.cases, &set.skipped, |_| {})
            .await;

        assert_eq!(report.total_cases, 1);
        assert_eq!(report.results.len(), 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].line, 2);
        assert_eq!(report.results[0].generated, "Salt Lake City");
        assert_eq!(report.results[0].answer_quality, 0.9);
        assert_eq!(report.results[0].context_precision, 1.0);
    }
}
