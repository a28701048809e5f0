//! # Book Finder
//!
//! Debounced, paged book search over the Open Library title search API.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Book, SearchQuery, SearchResponse)
//! - [`sources`]: The search backend trait, the Open Library client and a mock
//! - [`search`]: Debounce, pagination, fetch sequencing and the search session
//! - [`ui`]: Card view model and one-shot CLI output
//! - [`tui`]: Interactive terminal screen
//! - [`utils`]: HTTP client and display helpers
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod search;
pub mod sources;
pub mod tui;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Book, SearchQuery, SearchResponse};
pub use search::SearchSession;
pub use sources::{OpenLibrarySource, Source, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
