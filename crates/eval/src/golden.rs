//! Golden test cases, one JSON object per line.

use mentor_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A labeled test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenCase {
    #[serde(alias = "question")]
    pub input: String,

    #[serde(alias = "expected_answer")]
    pub expected: String,

    /// Passages that should be retrieved, matched as substrings
    #[serde(default)]
    pub expected_passages: Vec<String>,
}

/// A golden line that could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// Parsed golden file.
#[derive(Debug, Clone, Default)]
pub struct GoldenSet {
    pub cases: Vec<GoldenCase>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse golden JSON lines. Blank lines are ignored; malformed ones are
/// collected in `skipped`.
pub fn parse_goldens(content: &str) -> GoldenSet {
    let mut set = GoldenSet::default();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<GoldenCase>(trimmed) {
            Ok(case) if case.input.trim().is_empty() => set.skipped.push(SkippedLine {
                line: line_no,
                reason: "empty input".to_string(),
            }),
            Ok(case) if case.expected.trim().is_empty() => set.skipped.push(SkippedLine {
                line: line_no,
                reason: "empty expected answer".to_string(),
            }),
            Ok(case) => set.cases.push(case),
            Err(e) => {
                tracing::warn!("Skipping golden line {}: {}", line_no, e);
                set.skipped.push(SkippedLine {
                    line: line_no,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        "Parsed {} golden cases ({} skipped)",
        set.cases.len(),
        set.skipped.len()
    );
    set
}

/// Load a golden file from disk.
pub fn load_goldens(path: &Path) -> AppResult<GoldenSet> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read goldens file {:?}: {}", path, e))
    })?;
    Ok(parse_goldens(&content))
}
