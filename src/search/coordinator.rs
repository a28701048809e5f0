//! Fetch coordination with a staleness guard.
//!
//! Every dispatched fetch gets a sequence number. Fetches run as spawned tasks
//! and report back over a channel; only the outcome carrying the latest
//! sequence number may be applied. Older requests are never aborted, their
//! results are simply ignored.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::models::{SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};

/// Identifies one dispatched fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    query: SearchQuery,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Result of a spawned fetch, tagged with its ticket
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: RequestTicket,
    pub result: Result<SearchResponse, SourceError>,
}

/// What `dispatch` did with a query
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty query: answered immediately without touching the network
    Resolved(SearchResponse),
    /// A fetch task is running under this sequence number
    Pending(u64),
}

/// Issues searches against a [`Source`] and decides which results are current.
#[derive(Debug)]
pub struct FetchCoordinator {
    source: Arc<dyn Source>,
    latest: u64,
    in_flight: usize,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl FetchCoordinator {
    pub fn new(source: Arc<dyn Source>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            latest: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Run one search and wait for it. An empty title resolves to an empty
    /// page without a network call.
    pub async fn search(&self, title: &str, page: usize) -> Result<SearchResponse, SourceError> {
        let query = SearchQuery::new(title).page(page);
        if query.is_empty() {
            return Ok(SearchResponse::empty(title, query.page));
        }
        self.source.search(&query).await
    }

    /// Start a fetch for `query`, superseding every earlier dispatch.
    pub fn dispatch(&mut self, query: SearchQuery) -> Dispatch {
        self.latest += 1;
        let seq = self.latest;

        if query.is_empty() {
            tracing::debug!(seq, "Empty query, skipping fetch");
            return Dispatch::Resolved(SearchResponse::empty("", query.page));
        }

        tracing::debug!(
            seq,
            source = self.source.id(),
            title = %query.title,
            page = query.page,
            offset = query.offset(),
            "Dispatching fetch"
        );

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let ticket = RequestTicket { seq, query };
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = source.search(&ticket.query).await;
            let _ = tx.send(FetchOutcome { ticket, result });
        });

        Dispatch::Pending(seq)
    }

    /// Whether `ticket` belongs to the most recent dispatch
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.latest
    }

    /// Sequence number of the most recent dispatch (0 before any)
    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    /// Number of spawned fetches whose outcome has not been received yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next fetch to finish, current or not. Cancel-safe.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        let outcome = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }
}
