//! Responder implementations.

pub mod llm;
pub mod today;

pub use llm::{LlmResponder, ResponderProfile};
pub use today::{TodayResponder, DEFAULT_DATE_FORMAT};
