//! Deterministic rule-based routing.

use super::RoutingStrategy;
use crate::catalog::SPECIALISTS;
use crate::responder::ResponderInfo;
use mentor_core::AppResult;
use std::collections::HashSet;

/// Selects every responder whose keyword list matches the message.
///
/// Single words match whole words, phrases match as substrings and
/// operator symbols match only between operands. Matching is
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct KeywordRouter {
    rules: Vec<(String, Vec<String>)>,
}

impl KeywordRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for the built-in specialists plus the date responder.
    pub fn with_default_rules() -> Self {
        SPECIALISTS
            .iter()
            .fold(Self::new(), |router, profile| {
                router.with_rule(profile.id, profile.keywords.iter().copied())
            })
            .with_rule("today", ["today", "date", "what day"])
    }

    pub fn with_rule<I, S>(mut self, id: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push((
            id.into(),
            keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        ));
        self
    }

    fn matches(keyword: &str, lowered: &str, words: &HashSet<&str>) -> bool {
        if keyword.chars().all(char::is_alphanumeric) {
            words.contains(keyword)
        } else if keyword.chars().any(char::is_alphanumeric) {
            lowered.contains(keyword)
        } else {
            Self::matches_operator(keyword, lowered)
        }
    }

    /// An operator counts only between two operands, at least one of them
    /// numeric: `12 * 7` and `x^2` match, `and/or` and URLs do not.
    fn matches_operator(operator: &str, lowered: &str) -> bool {
        let is_operand = |c: char| c.is_alphanumeric() || c == '(' || c == ')';

        lowered.match_indices(operator).any(|(at, _)| {
            let before = lowered[..at].trim_end().chars().next_back();
            let after = lowered[at + operator.len()..].trim_start().chars().next();
            match (before, after) {
                (Some(b), Some(a)) => {
                    is_operand(b) && is_operand(a) && (b.is_ascii_digit() || a.is_ascii_digit())
                }
                _ => false,
            }
        })
    }
}

#[async_trait::async_trait]
impl RoutingStrategy for KeywordRouter {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn route(&self, query: &str, responders: &[ResponderInfo]) -> AppResult<Vec<String>> {
        let lowered = query.to_lowercase();
        let words: HashSet<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let selected: Vec<String> = self
            .rules
            .iter()
            .filter(|(id, _)| responders.iter().any(|r| &r.id == id))
            .filter(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|k| Self::matches(k, &lowered, &words))
            })
            .map(|(id, _)| id.clone())
            .collect();

        tracing::debug!("Keyword routing selected {:?}", selected);
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infos(ids: &[&str]) -> Vec<ResponderInfo> {
        ids.iter()
            .map(|id| ResponderInfo {
                id: id.to_string(),
                name: id.to_string(),
                description: String::new(),
            })
            .collect()
    }

    async fn route(query: &str) -> Vec<String> {
        KeywordRouter::with_default_rules()
            .route(
                query,
                &infos(&["math", "language", "english", "computer_science", "today"]),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_domain() {
        assert_eq!(route("What is 12 * 7?").await, vec!["math"]);
        assert_eq!(route("Translate 'good morning' to French").await, vec!["language"]);
        assert_eq!(route("Explain recursion in Python").await, vec!["computer_science"]);
        assert_eq!(route("What's the date today?").await, vec!["today"]);
    }

    #[tokio::test]
    async fn test_multiple_domains_in_rule_order() {
        let selected = route("Write a Python function to solve this equation").await;
        assert_eq!(selected, vec!["math", "computer_science"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        assert!(route("Who painted the Mona Lisa?").await.is_empty());
    }

    #[tokio::test]
    async fn test_whole_word_matching() {
        // "sum" must not match inside "summer"
        assert!(route("Tell me about summer").await.is_empty());
    }

    #[tokio::test]
    async fn test_operators_need_operands() {
        assert_eq!(route("What is 12 * 7?").await, vec!["math"]);
        assert_eq!(route("Simplify x^2").await, vec!["math"]);
        assert_eq!(route("If x = 5, what is y?").await, vec!["math"]);
        assert_eq!(route("What is (3+4)").await, vec!["math"]);

        assert_eq!(
            route("Is it correct to write and/or in an essay?").await,
            vec!["english"]
        );
        assert!(route("Who wrote https://example.com?").await.is_empty());
        assert!(route("Set a=b in the config, then *restart* it").await.is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_responders_are_skipped() {
        let selected = KeywordRouter::with_default_rules()
            .route("What is 2 + 2 today?", &infos(&["today"]))
            .await
            .unwrap();
        assert_eq!(selected, vec!["today"]);
    }
}
