//! Bibliographic search sources.
//!
//! A [`Source`] turns a [`SearchQuery`] into one page of [`SearchResponse`].
//! [`OpenLibrarySource`] talks to the Open Library search API; [`MockSource`]
//! serves scripted pages for tests and offline runs.

mod mock;
mod openlibrary;

pub use mock::{make_book, make_page, MockSource, RecordedRequest};
pub use openlibrary::{OpenLibrarySource, DEFAULT_COVER_ENDPOINT, DEFAULT_SEARCH_ENDPOINT};

use async_trait::async_trait;

use crate::models::{SearchQuery, SearchResponse, FETCH_FAILED_MESSAGE};

/// Interface for anything that can answer a paged title search.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one page of results. Callers handle the empty-query case before
    /// reaching the source.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The API answered with a non-success status
    #[error("API error {status}")]
    Api { status: u16 },

    /// Network failure or an unreadable response body
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SourceError {
    /// The message shown to users, regardless of the underlying cause
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }

    /// HTTP status code, for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Api { status } => Some(*status),
            SourceError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Transport(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_collapse_to_generic_message() {
        let api = SourceError::Api { status: 500 };
        let transport = SourceError::Transport("connection reset".to_string());

        assert_eq!(api.user_message(), "Failed to fetch results. Try again.");
        assert_eq!(transport.user_message(), api.user_message());
        assert_eq!(api.status(), Some(500));
        assert_eq!(transport.status(), None);
    }

    #[test]
    fn test_json_error_is_transport() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(SourceError::from(err), SourceError::Transport(_)));
    }
}
