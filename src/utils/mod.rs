//! Utility modules shared by the library and the binary.
//!
//! - [`HttpClient`]: reqwest client built from [`ApiConfig`](crate::config::ApiConfig)
//! - [`format_number`], [`truncate_with_ellipsis`]: text helpers for terminal output

mod display;
mod http;

pub use display::{
    book_table_columns, format_number, is_terminal, terminal_width, truncate_with_ellipsis,
};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
