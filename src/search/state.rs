//! Session state and the views derived from it.

use std::fmt;

use crate::models::{Book, RequestStatus};
use crate::utils::format_number;

use super::Pagination;

/// Everything a search session knows at one point in time.
///
/// Owned by [`SearchSession`](super::SearchSession) and mutated only by its
/// transitions; renderers get a shared borrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Raw input, updated on every keystroke
    pub query: String,
    /// Input that survived the quiet period; drives fetching
    pub committed_query: String,
    pub pagination: Pagination,
    /// Books on the current page
    pub results: Vec<Book>,
    pub status: RequestStatus,
}

impl SearchState {
    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn total_results(&self) -> usize {
        self.pagination.total_results()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    /// The single status line to show, if any
    pub fn status_line(&self) -> Option<StatusLine> {
        match &self.status {
            RequestStatus::Loading => Some(StatusLine::Loading),
            RequestStatus::Failed(message) => Some(StatusLine::Error(message.clone())),
            _ if !self.committed_query.is_empty() && self.results.is_empty() => {
                Some(StatusLine::NoResults(self.committed_query.clone()))
            }
            _ => None,
        }
    }

    /// Pager controls, shown only when the source reported matches
    pub fn pager(&self) -> Option<PagerView> {
        PagerView::from_pagination(&self.pagination)
    }
}

/// Status line variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Loading,
    Error(String),
    /// No matches for the committed query
    NoResults(String),
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Loading => write!(f, "Loading…"),
            StatusLine::Error(message) => write!(f, "{}", message),
            StatusLine::NoResults(query) => write!(f, "No results found for “{}”", query),
        }
    }
}

/// Pager controls and summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerView {
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PagerView {
    /// None when the source reported no matches
    pub fn from_pagination(pagination: &Pagination) -> Option<Self> {
        if pagination.total_results() == 0 {
            return None;
        }
        Some(Self {
            page: pagination.page(),
            total_pages: pagination.total_pages(),
            total_results: pagination.total_results(),
            prev_enabled: pagination.has_prev(),
            next_enabled: pagination.has_next(),
        })
    }
}

impl fmt::Display for PagerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Page {} of {} · {} results",
            self.page,
            self.total_pages,
            format_number(self.total_results)
        )
    }
}
