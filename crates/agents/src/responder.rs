//! Responder trait.

use mentor_core::AppResult;
use serde::{Deserialize, Serialize};

/// A specialist that answers one kind of question.
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// Stable identifier used by routing strategies (e.g. "math").
    fn id(&self) -> &str;

    /// Display name shown in routed replies (e.g. "Math Assistant").
    fn name(&self) -> &str;

    /// One-line description of the responder's domain, shown to routers.
    fn description(&self) -> &str;

    /// Answer a user message.
    async fn respond(&self, query: &str) -> AppResult<String>;

    fn info(&self) -> ResponderInfo {
        ResponderInfo {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// What a routing strategy knows about a responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}
