//! Search request and response models.

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Number of results requested per page. Not user-configurable.
pub const PAGE_SIZE: usize = 20;

/// User-visible message for any failed fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch results. Try again.";

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Title text as committed by the user
    pub title: String,

    /// One-based page number
    pub page: usize,

    /// Results per page
    pub limit: usize,
}

impl SearchQuery {
    /// Create a query for the first page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page: 1,
            limit: PAGE_SIZE,
        }
    }

    /// Set the page number (values below 1 are treated as 1)
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Zero-based index of the first result on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Whether there is anything to search for
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Books on this page
    pub books: Vec<Book>,

    /// Total number of matches reported by the source (may exceed what is retrievable)
    pub total_results: usize,

    /// Query that was executed
    pub query: String,

    /// Page that was requested
    pub page: usize,
}

impl SearchResponse {
    /// Create a response for the given query
    pub fn new(books: Vec<Book>, query: impl Into<String>, page: usize) -> Self {
        Self {
            books,
            total_results: 0,
            query: query.into(),
            page,
        }
    }

    /// An empty result set, as produced for an empty query or a failed fetch
    pub fn empty(query: impl Into<String>, page: usize) -> Self {
        Self::new(Vec::new(), query, page)
    }

    /// Set total results
    pub fn total_results(mut self, total: usize) -> Self {
        self.total_results = total;
        self
    }

    /// Number of pages implied by `total_results`
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_results)
    }
}

/// `ceil(total / PAGE_SIZE)`
pub fn total_pages(total_results: usize) -> usize {
    total_results.div_ceil(PAGE_SIZE)
}

/// Lifecycle of the most recently initiated fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    /// Error message, if the last fetch failed
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
