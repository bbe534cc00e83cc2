//! Conversation state for one chat.

use chrono::{DateTime, Utc};
use mentor_llm::ChatMessage;

/// In-memory history of a conversation, passed to each pipeline call.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    /// Show retrieved passages alongside answers
    pub verbose: bool,
    history: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            verbose: false,
            history: Vec::new(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Flip verbose mode, returning the new state.
    pub fn toggle_verbose(&mut self) -> bool {
        self.verbose = !self.verbose;
        self.verbose
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Append a completed user/assistant exchange.
    pub fn record_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(ChatMessage::user(user));
        self.history.push(ChatMessage::assistant(assistant));
    }

    pub fn turns(&self) -> usize {
        self.history.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_llm::ChatRole;

    #[test]
    fn test_record_turn_keeps_order() {
        let mut session = ChatSession::new();
        session.record_turn("hi", "hello");
        session.record_turn("how are you?", "fine");

        assert_eq!(session.turns(), 2);
        let roles: Vec<ChatRole> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant
            ]
        );
        assert_eq!(session.history()[2].content, "how are you?");
    }

    #[test]
    fn test_toggle_verbose() {
        let mut session = ChatSession::new().with_verbose(true);
        assert!(!session.toggle_verbose());
        assert!(session.toggle_verbose());
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(ChatSession::new().id, ChatSession::new().id);
    }
}
