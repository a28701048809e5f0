//! Book card rendering model.

use serde::Serialize;
use std::fmt;

use crate::models::Book;

/// Text shown where a cover image would be when the book has none
pub const NO_COVER: &str = "No cover";

/// Cover slot of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cover {
    Image(String),
    /// Serializes as `null`
    Placeholder,
}

impl Cover {
    pub fn url(&self) -> Option<&str> {
        match self {
            Cover::Image(url) => Some(url),
            Cover::Placeholder => None,
        }
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cover::Image(url) => write!(f, "{}", url),
            Cover::Placeholder => write!(f, "{}", NO_COVER),
        }
    }
}

/// Everything a result card shows, placeholders already applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCard {
    pub key: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub cover: Cover,
    pub tags: Vec<String>,
}

impl BookCard {
    pub fn from_book(book: &Book, cover_endpoint: &str) -> Self {
        let cover = match book.cover_url(cover_endpoint) {
            Some(url) => Cover::Image(url),
            None => Cover::Placeholder,
        };

        Self {
            key: book.key.clone(),
            title: book.display_title().to_string(),
            authors: book.display_authors(),
            year: book.display_year(),
            cover,
            tags: book.tags().to_vec(),
        }
    }
}

/// Cards for a page of books
pub fn cards(books: &[Book], cover_endpoint: &str) -> Vec<BookCard> {
    books
        .iter()
        .map(|book| BookCard::from_book(book, cover_endpoint))
        .collect()
}
