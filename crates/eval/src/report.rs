//! Evaluation results and their YAML summary.

use crate::golden::SkippedLine;
use crate::metrics::mean;
use mentor_core::{AppError, AppResult};
use serde::Serialize;
use std::path::Path;

/// Scores for one golden case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// 1-based position in the golden file's valid cases
    pub index: usize,
    pub question: String,
    pub expected: String,
    pub generated: String,
    pub contexts: Vec<String>,
    pub answer_quality: f64,
    pub reasoning: String,
    pub context_precision: f64,
}

/// A valid case whose pipeline or judge call failed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCase {
    /// 1-based position among the valid cases, as in [`CaseResult::index`]
    pub case: usize,
    pub question: String,
    pub reason: String,
}

/// Outcome of an evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub total_cases: usize,
    pub prompt_version: String,
    pub results: Vec<CaseResult>,
    /// Cases that could not be scored
    pub skipped: Vec<SkippedCase>,
    /// Golden file lines that never became cases, by line number
    pub malformed: Vec<SkippedLine>,
    pub average_answer_quality: f64,
    pub average_context_precision: f64,
}

#[derive(Debug, Serialize)]
struct SummaryFile {
    evaluation_summary: Summary,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_test_cases: usize,
    scored_test_cases: usize,
    skipped_test_cases: usize,
    malformed_lines: usize,
    prompt_version: String,
    answer_quality: MetricSummary,
    context_precision: MetricSummary,
    individual_scores: IndividualScores,
}

#[derive(Debug, Serialize)]
struct MetricSummary {
    average_score: f64,
    max_score: f64,
}

#[derive(Debug, Serialize)]
struct IndividualScores {
    answer_quality: Vec<f64>,
    context_precision: Vec<f64>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl EvalReport {
    pub fn new(prompt_version: &str, total_cases: usize) -> Self {
        Self {
            total_cases,
            prompt_version: prompt_version.to_string(),
            results: Vec::new(),
            skipped: Vec::new(),
            malformed: Vec::new(),
            average_answer_quality: 0.0,
            average_context_precision: 0.0,
        }
    }

    /// Recompute the averages over scored cases.
    pub fn finalize(&mut self) {
        self.average_answer_quality = mean(&self.answer_quality_scores());
        self.average_context_precision = mean(&self.context_precision_scores());
    }

    pub fn answer_quality_scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.answer_quality).collect()
    }

    pub fn context_precision_scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.context_precision).collect()
    }

    fn summary(&self) -> SummaryFile {
        SummaryFile {
            evaluation_summary: Summary {
                total_test_cases: self.total_cases,
                scored_test_cases: self.results.len(),
                skipped_test_cases: self.skipped.len(),
                malformed_lines: self.malformed.len(),
                prompt_version: self.prompt_version.clone(),
                answer_quality: MetricSummary {
                    average_score: round3(self.average_answer_quality),
                    max_score: 1.0,
                },
                context_precision: MetricSummary {
                    average_score: round3(self.average_context_precision),
                    max_score: 1.0,
                },
                individual_scores: IndividualScores {
                    answer_quality: self.answer_quality_scores(),
                    context_precision: self.context_precision_scores(),
                },
            },
        }
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(&self.summary())?)
    }

    /// Write the YAML summary, creating parent directories as needed.
    pub fn write_yaml(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Eval(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::write(path, self.to_yaml()?).map_err(|e| {
            AppError::Eval(format!(
                "Failed to write evaluation results to {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!("Evaluation results saved to {}", path.display());
        Ok(())
    }

    /// Closing lines with the averages.
    pub fn format_totals(&self) -> String {
        format!(
            "Average Answer Quality: {:.3}/1.0\nAverage Context Precision: {:.3}/1.0",
            self.average_answer_quality, self.average_context_precision
        )
    }
}

/// Human-readable block for one scored case.
pub fn format_case(result: &CaseResult) -> String {
    format!(
        "Test Case {}:\n  Question: {}\n  Expected: {}\n  Generated: {}\n  Retrieved Context: {:?}\n  Answer Quality: {:.1}/1.0\n  Context Precision: {:.3}\n",
        result.index,
        result.question,
        result.expected,
        result.generated,
        result.contexts,
        result.answer_quality,
        result.context_precision
    )
}
