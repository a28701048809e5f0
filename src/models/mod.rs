//! Core data models for books and search operations.

mod book;
mod search;

pub use book::{Book, BookBuilder, MAX_TAGS, UNKNOWN_AUTHOR, UNKNOWN_YEAR, UNTITLED};
pub use search::{
    total_pages, RequestStatus, SearchQuery, SearchResponse, FETCH_FAILED_MESSAGE, PAGE_SIZE,
};
