//! Runs golden cases through a pipeline and scores them.

use crate::golden::{GoldenCase, SkippedLine};
use crate::judge::Judge;
use crate::metrics::{context_precision, matches_expected};
use crate::report::{CaseResult, EvalReport, SkippedCase};
use mentor_core::AppResult;
use mentor_knowledge::{ChatSession, RagAnswer, RagPipeline};
use std::sync::Arc;

/// The system under evaluation.
#[async_trait::async_trait]
pub trait EvalTarget: Send + Sync {
    async fn answer(&self, session: &mut ChatSession, question: &str) -> AppResult<RagAnswer>;
}

#[async_trait::async_trait]
impl EvalTarget for RagPipeline {
    async fn answer(&self, session: &mut ChatSession, question: &str) -> AppResult<RagAnswer> {
        RagPipeline::answer(self, session, question).await
    }
}

/// Scores golden cases with a judge.
///
/// One chat session is shared by every case, so later answers see the
/// earlier exchanges.
pub struct Harness {
    judge: Arc<dyn Judge>,
    prompt_version: String,
}

impl Harness {
    pub fn new(judge: Arc<dyn Judge>, prompt_version: impl Into<String>) -> Self {
        Self {
            judge,
            prompt_version: prompt_version.into(),
        }
    }

    pub async fn run(&self, target: &dyn EvalTarget, cases: &[GoldenCase]) -> EvalReport {
        self.run_with(target, cases, &[], |_| {}).await
    }

    /// Run every case, calling `on_case` as each one is scored.
    ///
    /// Cases whose pipeline or judge call fails are recorded as skipped.
    pub async fn run_with<F>(
        &self,
        target: &dyn EvalTarget,
        cases: &[GoldenCase],
        malformed: &[SkippedLine],
        mut on_case: F,
    ) -> EvalReport
    where
        F: FnMut(&CaseResult) + Send,
    {
        tracing::info!("Starting evaluation with {} test cases", cases.len());

        let mut session = ChatSession::new();
        let mut report = EvalReport::new(&self.prompt_version, cases.len());
        report.malformed = malformed.to_vec();

        for (i, case) in cases.iter().enumerate() {
            let index = i + 1;
            match self.score_case(&mut session, target, index, case).await {
                Ok(result) => {
                    tracing::debug!(
                        "Case {}: quality={:.1} precision={:.3}",
                        index,
                        result.answer_quality,
                        result.context_precision
                    );
                    on_case(&result);
                    report.results.push(result);
                }
                Err(e) => {
                    tracing::warn!("Skipping test case {}: {}", index, e);
                    report.skipped.push(SkippedCase {
                        case: index,
                        question: case.input.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.finalize();
        tracing::info!(
            "Evaluation finished: {} scored, {} skipped, {} malformed lines",
            report.results.len(),
            report.skipped.len(),
            report.malformed.len()
        );
        report
    }

    async fn score_case(
        &self,
        session: &mut ChatSession,
        target: &dyn EvalTarget,
        index: usize,
        case: &GoldenCase,
    ) -> AppResult<CaseResult> {
        let answer = target.answer(session, &case.input).await?;

        let quality = self
            .judge
            .answer_quality(&case.input, &case.expected, &answer.text)
            .await?;

        let contexts = answer.context_texts();
        let mut usefulness = Vec::with_capacity(contexts.len());
        for passage in &contexts {
            let useful = if case.expected_passages.is_empty() {
                self.judge
                    .is_useful(&case.input, passage, &case.expected)
                    .await?
            } else {
                matches_expected(passage, &case.expected_passages)
            };
            usefulness.push(useful);
        }

        Ok(CaseResult {
            index,
            question: case.input.clone(),
            expected: case.expected.clone(),
            generated: answer.text,
            contexts,
            answer_quality: quality.score,
            reasoning: quality.reasoning,
            context_precision: context_precision(&usefulness),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::QualityVerdict;
    use mentor_core::AppError;
    use mentor_knowledge::{DocumentChunk, RetrievedPassage};
    use mentor_llm::{ChatMessage, LlmUsage};
    use std::sync::Mutex;

    /// Replies from a script and remembers the history it was given.
    struct Scripted {
        replies: Mutex<Vec<AppResult<(String, Vec<&'static str>)>>>,
        histories: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl Scripted {
        fn new(replies: Vec<AppResult<(String, Vec<&'static str>)>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                histories: Mutex::new(Vec::new()),
            }
        }
    }

    fn passage(text: &str) -> RetrievedPassage {
        RetrievedPassage {
            chunk: DocumentChunk {
                id: text.to_string(),
                source: "test".to_string(),
                position: 0,
                text: text.to_string(),
                heading_path: Vec::new(),
                content_hash: String::new(),
            },
            score: 0.9,
        }
    }

    #[async_trait::async_trait]
    impl EvalTarget for Scripted {
        async fn answer(&self, session: &mut ChatSession, question: &str) -> AppResult<RagAnswer> {
            self.histories
                .lock()
                .unwrap()
                .push(session.history().to_vec());
            let (text, passages) = self.replies.lock().unwrap().pop().unwrap()?;
            session.record_turn(question, text.clone());
            Ok(RagAnswer {
                text,
                passages: passages.into_iter().map(passage).collect(),
                usage: LlmUsage::default(),
            })
        }
    }

    /// Scores 1.0 when the answer contains the reference, 0.0 otherwise;
    /// a passage is useful when it contains the answer.
    struct Substring;

    #[async_trait::async_trait]
    impl Judge for Substring {
        async fn answer_quality(
            &self,
            _question: &str,
            reference: &str,
            predicted: &str,
        ) -> AppResult<QualityVerdict> {
            Ok(QualityVerdict {
                score: if predicted.contains(reference) { 1.0 } else { 0.0 },
                reasoning: String::new(),
            })
        }

        async fn is_useful(&self, _question: &str, passage: &str, answer: &str) -> AppResult<bool> {
            Ok(passage.contains(answer))
        }
    }

    fn case(input: &str, expected: &str, expected_passages: &[&str]) -> GoldenCase {
        GoldenCase {
            input: input.to_string(),
            expected: expected.to_string(),
            expected_passages: expected_passages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_one_score_per_case_and_mean() {
        let target = Scripted::new(vec![
            Ok((
                "It is Salt Lake City.".to_string(),
                vec!["Utah is a state.", "The capital of Utah is Salt Lake City."],
            )),
            Ok(("No idea.".to_string(), vec!["The first governor of Utah was Blue Bayou."])),
        ]);
        let harness = Harness::new(Arc::new(Substring), "v1");

        let report = harness
            .run(
                &target,
                &[
                    case("Capital?", "Salt Lake City", &[]),
                    case("First governor?", "Blue Bayou", &["first governor"]),
                ],
            )
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].answer_quality, 1.0);
        assert_eq!(report.results[0].context_precision, 0.5);
        assert_eq!(report.results[1].answer_quality, 0.0);
        assert_eq!(report.results[1].context_precision, 1.0);
        assert_eq!(report.average_answer_quality, 0.5);
        assert_eq!(report.average_context_precision, 0.75);
    }

    #[tokio::test]
    async fn test_session_is_shared_across_cases() {
        let target = Scripted::new(vec![
            Ok(("one".to_string(), vec![])),
            Ok(("two".to_string(), vec![])),
        ]);
        let harness = Harness::new(Arc::new(Substring), "v1");
        harness
            .run(&target, &[case("first", "one", &[]), case("second", "two", &[])])
            .await;

        let histories = target.histories.lock().unwrap();
        assert!(histories[0].is_empty());
        assert_eq!(histories[1].len(), 2);
        assert_eq!(histories[1][0].content, "first");
    }

    #[tokio::test]
    async fn test_failures_are_skipped_not_fatal() {
        let target = Scripted::new(vec![
            Err(AppError::Llm("quota exceeded".to_string())),
            Ok(("Salt Lake City".to_string(), vec![])),
        ]);
        let harness = Harness::new(Arc::new(Substring), "v2");

        let malformed = vec![SkippedLine {
            line: 4,
            reason: "expected value".to_string(),
        }];
        let mut seen = Vec::new();
        let report = harness
            .run_with(
                &target,
                &[case("a", "x", &[]), case("b", "Salt Lake City", &[])],
                &malformed,
                |result| seen.push(result.index),
            )
            .await;

        assert_eq!(seen, vec![2]);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].case, 1);
        assert_eq!(report.skipped[0].question, "a");
        assert!(report.skipped[0].reason.contains("quota exceeded"));
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].line, 4);
        assert_eq!(report.average_answer_quality, 1.0);
        assert_eq!(report.average_context_precision, 0.0);
    }
}
