//! Dispatches a message to the responders chosen by a routing strategy.

use crate::responder::{Responder, ResponderInfo};
use crate::routing::RoutingStrategy;
use mentor_core::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// One responder's contribution to a turn.
#[derive(Debug, Clone, Serialize)]
pub struct RoutedReply {
    pub responder_id: String,
    pub responder_name: String,
    pub text: String,
    pub duration_ms: u64,
}

/// Timing and selection details for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnMetrics {
    pub router: String,
    pub selected: Vec<String>,
    pub used_fallback: bool,
    pub routing_ms: u64,
    pub total_ms: u64,
}

/// The synthesized reply for a turn.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratedReply {
    pub text: String,
    pub replies: Vec<RoutedReply>,
    pub metrics: TurnMetrics,
}

/// Routes each message to one or more specialists.
///
/// Selected responders run one after another in registration order, each
/// at most once. With no selection the fallback answers instead.
pub struct Orchestrator {
    responders: Vec<Arc<dyn Responder>>,
    fallback: Arc<dyn Responder>,
    strategy: Arc<dyn RoutingStrategy>,
}

impl Orchestrator {
    pub fn new(strategy: Arc<dyn RoutingStrategy>, fallback: Arc<dyn Responder>) -> Self {
        Self {
            responders: Vec::new(),
            fallback,
            strategy,
        }
    }

    pub fn register(&mut self, responder: Arc<dyn Responder>) {
        tracing::debug!("Registered responder '{}'", responder.id());
        self.responders.push(responder);
    }

    pub fn with_responders<I>(mut self, responders: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Responder>>,
    {
        for responder in responders {
            self.register(responder);
        }
        self
    }

    /// Responders offered to the router: registered ones, then the fallback.
    pub fn responder_infos(&self) -> Vec<ResponderInfo> {
        self.responders
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|r| r.info())
            .collect()
    }

    /// Answer one message.
    pub async fn handle(&self, query: &str) -> AppResult<OrchestratedReply> {
        let start = Instant::now();

        let selected_ids = self
            .strategy
            .route(query, &self.responder_infos())
            .await?;
        let routing_ms = start.elapsed().as_millis() as u64;

        let candidates = self
            .responders
            .iter()
            .chain(std::iter::once(&self.fallback));
        let mut selected: Vec<&Arc<dyn Responder>> = candidates
            .filter(|r| selected_ids.iter().any(|id| id == r.id()))
            .collect();

        let used_fallback = selected.is_empty();
        if used_fallback {
            tracing::info!("No responder selected, using {}", self.fallback.name());
            selected.push(&self.fallback);
        }

        let mut replies = Vec::with_capacity(selected.len());
        for responder in selected {
            let started = Instant::now();
            let text = responder.respond(query).await.map_err(|e| {
                AppError::Agent(format!("{} failed: {}", responder.name(), e))
            })?;
            replies.push(RoutedReply {
                responder_id: responder.id().to_string(),
                responder_name: responder.name().to_string(),
                text,
                duration_ms: started.elapsed().as_millis() as u64,
            });
        }

        let text = replies
            .iter()
            .map(|r| format!("Routed to {}\n\n{}", r.responder_name, r.text.trim_end()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let metrics = TurnMetrics {
            router: self.strategy.name().to_string(),
            selected: replies.iter().map(|r| r.responder_id.clone()).collect(),
            used_fallback,
            routing_ms,
            total_ms: start.elapsed().as_millis() as u64,
        };

        Ok(OrchestratedReply {
            text,
            replies,
            metrics,
        })
    }
}
