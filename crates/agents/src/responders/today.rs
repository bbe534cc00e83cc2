//! The "current day" responder.

use crate::responder::Responder;
use chrono::Local;
use mentor_core::AppResult;

pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// Answers with the host's local date.
#[derive(Debug, Clone)]
pub struct TodayResponder {
    format: String,
}

impl Default for TodayResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl TodayResponder {
    pub fn new() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Use a chrono `strftime` format string.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

#[async_trait::async_trait]
impl Responder for TodayResponder {
    fn id(&self) -> &str {
        "today"
    }

    fn name(&self) -> &str {
        "Today"
    }

    fn description(&self) -> &str {
        "Returns today's date. Use for questions about the current day or date."
    }

    async fn respond(&self, _query: &str) -> AppResult<String> {
        Ok(Local::now().format(&self.format).to_string())
    }
}
