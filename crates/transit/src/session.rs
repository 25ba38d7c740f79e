//! The single "current displayed route" slot.
//!
//! Queries may complete out of order. Every query takes a ticket with a
//! strictly increasing sequence number, and only the most recently issued
//! ticket may update the slot. Older results are dropped on arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::types::*;
use crate::network::traits::RouteTextGenerator;
use crate::resolver::{RouteReport, RouteResolver};

/// Proof that a query was issued; compared against the latest on completion
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Loaded {
        #[serde(flatten)]
        report: Arc<RouteReport>,
    },
    Failed {
        message: &'static str,
    },
}

impl DisplayState {
    pub fn report(&self) -> Option<&Arc<RouteReport>> {
        match self {
            Self::Loaded { report } => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct QuerySession {
    issued: AtomicU64,
    slot: RwLock<DisplayState>,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket. Any result for an earlier ticket is now stale.
    pub async fn begin(&self) -> QueryTicket {
        let mut slot = self.slot.write().await;
        let ticket = QueryTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
        *slot = DisplayState::Loading;
        ticket
    }

    pub fn latest(&self) -> Option<QueryTicket> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            n => Some(QueryTicket(n)),
        }
    }

    /// Store the outcome for `ticket` if it is still the latest.
    ///
    /// Returns the new display state, or `None` when the result was
    /// superseded and discarded.
    pub async fn complete(
        &self,
        ticket: QueryTicket,
        outcome: Result<RouteReport>,
    ) -> Option<DisplayState> {
        let mut slot = self.slot.write().await;

        if self.latest() != Some(ticket) {
            tracing::debug!(
                "discarding result for query #{} (latest is #{})",
                ticket.0,
                self.issued.load(Ordering::SeqCst)
            );
            return None;
        }

        *slot = match outcome {
            Ok(report) => DisplayState::Loaded {
                report: Arc::new(report),
            },
            Err(e) => {
                tracing::warn!("query #{} failed ({}): {}", ticket.0, e.kind(), e);
                DisplayState::Failed {
                    message: e.user_message(),
                }
            }
        };

        Some(slot.clone())
    }

    /// Resolve `query` and publish the result if no newer query overtook it.
    ///
    /// Blank queries are ignored and leave the slot untouched.
    pub async fn run<G: RouteTextGenerator>(
        &self,
        resolver: &RouteResolver<G>,
        query: &str,
    ) -> Option<DisplayState> {
        if query.trim().is_empty() {
            return None;
        }

        let ticket = self.begin().await;
        let outcome = resolver.resolve(query).await;
        self.complete(ticket, outcome).await
    }

    pub async fn current(&self) -> DisplayState {
        self.slot.read().await.clone()
    }

    pub async fn is_pending(&self) -> bool {
        matches!(*self.slot.read().await, DisplayState::Loading)
    }
}
