//! Search session: input → debounce → commit → fetch → apply.

use std::sync::Arc;
use std::time::Duration;

use crate::models::{RequestStatus, SearchQuery};
use crate::sources::Source;

use super::{Debouncer, Dispatch, FetchCoordinator, FetchOutcome, SearchState};

/// Asynchronous happenings a session reacts to
#[derive(Debug)]
pub enum SessionEvent {
    /// Input survived the quiet period
    Committed(String),
    /// A fetch finished (possibly a stale one)
    Fetched(FetchOutcome),
}

/// Owns the search state and the only paths that mutate it.
///
/// - Committing a query that differs from the current one resets the page to 1
///   and fetches page 1.
/// - Moving the page while a non-empty query is committed fetches that page.
/// - Fetch outcomes are applied only if they belong to the latest dispatch.
#[derive(Debug)]
pub struct SearchSession {
    state: SearchState,
    debouncer: Debouncer<String>,
    coordinator: FetchCoordinator,
}

impl SearchSession {
    /// Create a session. Must be called inside a tokio runtime.
    pub fn new(source: Arc<dyn Source>, debounce: Duration) -> Self {
        Self {
            state: SearchState::default(),
            debouncer: Debouncer::new(debounce),
            coordinator: FetchCoordinator::new(source),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Replace the raw input and restart the quiet period.
    pub fn set_query(&mut self, input: impl Into<String>) {
        let input = input.into();
        if input == self.state.query {
            return;
        }
        self.state.query = input.clone();
        self.debouncer.push(input);
    }

    /// Empty the input and commit the empty query right away.
    pub fn clear(&mut self) {
        self.state.query.clear();
        self.debouncer.cancel();
        self.commit_query(String::new());
    }

    /// Commit `query` immediately, bypassing the debounce.
    pub fn submit(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.query = query.clone();
        self.debouncer.cancel();
        self.commit_query(query);
    }

    /// Next page; no-op on the last page or without results.
    pub fn next_page(&mut self) -> bool {
        if !self.state.pagination.next_page() {
            return false;
        }
        self.on_page_changed();
        true
    }

    /// Previous page; no-op on page 1.
    pub fn prev_page(&mut self) -> bool {
        if !self.state.pagination.prev_page() {
            return false;
        }
        self.on_page_changed();
        true
    }

    /// Wait for the next debounce emission or fetch outcome.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            Some(value) = self.debouncer.settled() => Some(SessionEvent::Committed(value)),
            Some(outcome) = self.coordinator.next_outcome() => Some(SessionEvent::Fetched(outcome)),
            else => None,
        }
    }

    /// Apply an event. Returns whether visible state changed.
    pub fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Committed(value) => self.commit_query(value),
            SessionEvent::Fetched(outcome) => self.apply_outcome(outcome),
        }
    }

    /// No debounce pending and no fetch outstanding.
    pub fn is_idle(&self) -> bool {
        !self.debouncer.is_pending() && self.coordinator.in_flight() == 0
    }

    /// Process events until the session is idle.
    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            match self.next_event().await {
                Some(event) => {
                    self.handle(event);
                }
                None => break,
            }
        }
    }

    fn commit_query(&mut self, value: String) -> bool {
        if value == self.state.committed_query {
            return false;
        }
        tracing::debug!(query = %value, "Committed query changed");
        self.state.committed_query = value;
        self.state.pagination.reset();
        self.fetch_current_page();
        true
    }

    fn on_page_changed(&mut self) {
        if self.state.committed_query.is_empty() {
            return;
        }
        self.fetch_current_page();
    }

    fn fetch_current_page(&mut self) {
        let query = SearchQuery::new(self.state.committed_query.clone()).page(self.state.page());

        match self.coordinator.dispatch(query) {
            Dispatch::Resolved(response) => {
                self.state.results = response.books;
                self.state.pagination.set_total_results(response.total_results);
                self.state.status = RequestStatus::Idle;
            }
            Dispatch::Pending(_) => {
                self.state.status = RequestStatus::Loading;
            }
        }
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        if !self.coordinator.is_current(&outcome.ticket) {
            tracing::debug!(
                seq = outcome.ticket.seq(),
                latest = self.coordinator.latest_seq(),
                "Discarding stale fetch result"
            );
            return false;
        }

        match outcome.result {
            Ok(response) => {
                tracing::debug!(
                    seq = outcome.ticket.seq(),
                    books = response.books.len(),
                    total = response.total_results,
                    "Applying fetch result"
                );
                self.state.results = response.books;
                self.state.pagination.set_total_results(response.total_results);
                self.state.status = RequestStatus::Success;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    title = %outcome.ticket.query().title,
                    page = outcome.ticket.query().page,
                    "Search failed"
                );
                self.state.results.clear();
                self.state.pagination.set_total_results(0);
                self.state.status = RequestStatus::Failed(err.user_message().to_string());
            }
        }
        true
    }
}
