//! Book model representing a single search hit.

use serde::{Deserialize, Serialize};

/// Shown when a record carries no title
pub const UNTITLED: &str = "Untitled";

/// Shown when a record carries no author names
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Shown when neither a first-publish year nor any publish year is known
pub const UNKNOWN_YEAR: &str = "—";

/// Maximum number of subject tags shown for a book
pub const MAX_TAGS: usize = 5;

/// A book as reported by the bibliographic search API.
///
/// Every field except `key` may be missing upstream; the `display_*` helpers
/// supply the placeholders used by the card renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Remote work identifier (e.g. `/works/OL893415W`)
    pub key: String,

    /// Title, if the record has one
    pub title: Option<String>,

    /// Author names in the order the source lists them
    #[serde(default)]
    pub authors: Vec<String>,

    /// First publication year, or the first listed publish year
    pub publication_year: Option<i32>,

    /// Cover image identifier used to derive the cover URL
    pub cover_id: Option<u64>,

    /// Subject tags in source order
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Book {
    /// Create a bare record with only its key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            authors: Vec::new(),
            publication_year: None,
            cover_id: None,
            subjects: Vec::new(),
        }
    }

    /// Title or the "Untitled" placeholder
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }

    /// Comma-joined author list or the "Unknown author" placeholder
    pub fn display_authors(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Year as text, or a dash when unknown
    pub fn display_year(&self) -> String {
        self.publication_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }

    /// The first few subject tags
    pub fn tags(&self) -> &[String] {
        let end = self.subjects.len().min(MAX_TAGS);
        &self.subjects[..end]
    }

    /// Medium-size cover URL under the given cover endpoint, if the book has a cover
    pub fn cover_url(&self, cover_endpoint: &str) -> Option<String> {
        self.cover_id.map(|id| {
            format!(
                "{}/b/id/{}-M.jpg",
                cover_endpoint.trim_end_matches('/'),
                id
            )
        })
    }
}

/// Builder for [`Book`]
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    /// Start a builder for the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            book: Book::new(key),
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.book.title = Some(title.into());
        self
    }

    /// Append an author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.authors.push(author.into());
        self
    }

    /// Set the publication year
    pub fn year(mut self, year: i32) -> Self {
        self.book.publication_year = Some(year);
        self
    }

    /// Set the cover id
    pub fn cover_id(mut self, cover_id: u64) -> Self {
        self.book.cover_id = Some(cover_id);
        self
    }

    /// Append a subject tag
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.book.subjects.push(subject.into());
        self
    }

    pub fn build(self) -> Book {
        self.book
    }
}
