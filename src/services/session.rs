use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use crate::{
    error::AppResult,
    models::{SearchQuery, SearchResult},
    services::{
        cancel::{cancel_pair, CancelHandle, CancelToken},
        providers::RecommendationProvider,
    },
};

/// Result of a search run through a session
#[derive(Debug)]
pub enum SearchOutcome {
    /// The search is still the most recent one; show these results
    Current(Vec<SearchResult>),
    /// A newer search started while this one was in flight; discard
    Stale { sequence: u64 },
}

/// Identifies one search within a session
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub sequence: u64,
    pub token: CancelToken,
}

/// Last-request-wins coordination for one caller
///
/// Every search takes a new sequence number and cancels the previous in-flight
/// search. Outcomes whose sequence number is no longer current are reported as
/// stale so the caller never renders an older answer over a newer one.
#[derive(Debug, Default)]
pub struct SearchSession {
    sequence: AtomicU64,
    in_flight: Mutex<Option<CancelHandle>>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new search, cancelling whichever one was in flight
    pub fn begin(&self) -> SearchTicket {
        let (handle, token) = cancel_pair();
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.replace(handle) {
            previous.cancel();
        }

        SearchTicket { sequence, token }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket.sequence
    }

    /// Most recently issued sequence number (0 before the first search)
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Runs a search with last-request-wins semantics
    ///
    /// Errors belonging to the current search are returned as-is.
    pub async fn search(
        &self,
        provider: &dyn RecommendationProvider,
        query: &SearchQuery,
    ) -> AppResult<SearchOutcome> {
        let ticket = self.begin();
        let result = provider.search(query, &ticket.token).await;
        self.settle(&ticket, result)
    }

    fn settle(
        &self,
        ticket: &SearchTicket,
        result: AppResult<Vec<SearchResult>>,
    ) -> AppResult<SearchOutcome> {
        if !self.is_current(ticket) {
            tracing::debug!(
                sequence = ticket.sequence,
                latest = self.latest_sequence(),
                "Discarding stale search outcome"
            );
            return Ok(SearchOutcome::Stale {
                sequence: ticket.sequence,
            });
        }

        result.map(SearchOutcome::Current)
    }
}
