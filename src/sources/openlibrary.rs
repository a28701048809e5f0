//! Open Library search source implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{Book, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Default title search endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://openlibrary.org/search.json";

/// Default cover image host
pub const DEFAULT_COVER_ENDPOINT: &str = "https://covers.openlibrary.org";

/// Open Library title search
///
/// Uses the `search.json` endpoint with `title`, `limit` and `offset` parameters.
#[derive(Debug, Clone)]
pub struct OpenLibrarySource {
    http: HttpClient,
    endpoint: String,
}

impl OpenLibrarySource {
    /// Create a source pointed at a custom endpoint (mirrors, test servers)
    pub fn with_endpoint(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// The configured search endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build request URL
    fn build_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?title={}&limit={}&offset={}",
            self.endpoint,
            urlencoding::encode(&query.title),
            query.limit,
            query.offset()
        )
    }

    /// Parse an Open Library document
    fn parse_book(doc: OLDoc) -> Book {
        let publication_year = doc
            .first_publish_year
            .or_else(|| doc.publish_year.as_ref().and_then(|years| years.first().copied()));

        Book {
            key: doc.key.unwrap_or_default(),
            title: doc.title,
            authors: doc.author_name.unwrap_or_default(),
            publication_year,
            // cover id 0 means no cover
            cover_id: doc.cover_i.filter(|id| *id != 0),
            subjects: doc.subject.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Source for OpenLibrarySource {
    fn id(&self) -> &str {
        "openlibrary"
    }

    fn name(&self) -> &str {
        "Open Library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let url = self.build_url(query);
        tracing::debug!(%url, "Searching Open Library");

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("Failed to search Open Library: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api {
                status: response.status().as_u16(),
            });
        }

        let data: OLSearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Transport(format!("Failed to parse JSON: {}", e)))?;

        let books = data.docs.into_iter().map(Self::parse_book).collect();

        Ok(SearchResponse::new(books, &query.title, query.page).total_results(data.num_found))
    }
}

// ===== Open Library API Types =====

#[derive(Debug, Deserialize)]
struct OLSearchResponse {
    #[serde(rename = "numFound", default, deserialize_with = "lenient_count")]
    num_found: usize,
    #[serde(default, deserialize_with = "lenient_docs")]
    docs: Vec<OLDoc>,
}

/// Every field is optional; a field with an unexpected type reads as absent.
#[derive(Debug, Deserialize)]
struct OLDoc {
    #[serde(default, deserialize_with = "lenient")]
    key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    author_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    publish_year: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "lenient")]
    cover_i: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    subject: Option<Vec<String>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A missing or non-numeric `numFound` counts as zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().map(|n| n as usize).unwrap_or(0))
}

/// A `docs` field that is not a list yields no books; list entries that are
/// not JSON objects are dropped.
fn lenient_docs<'de, D>(deserializer: D) -> Result<Vec<OLDoc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let docs = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> OLSearchResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_build_url_encodes_title_and_offset() {
        let source = OpenLibrarySource::with_endpoint(HttpClient::new(), "http://localhost/search.json");
        let query = SearchQuery::new("Pride & Prejudice").page(3);
        assert_eq!(
            source.build_url(&query),
            "http://localhost/search.json?title=Pride%20%26%20Prejudice&limit=20&offset=40"
        );
    }

    #[test]
    fn test_parse_full_document() {
        let data = parse(
            r#"{"numFound": 45, "docs": [{
                "key": "/works/OL893415W",
                "title": "Dune",
                "author_name": ["Frank Herbert"],
                "first_publish_year": 1965,
                "publish_year": [1990, 1965],
                "cover_i": 8231856,
                "subject": ["Science fiction", "Arrakis"]
            }]}"#,
        );
        assert_eq!(data.num_found, 45);

        let book = OpenLibrarySource::parse_book(data.docs.into_iter().next().unwrap());
        assert_eq!(book.key, "/works/OL893415W");
        assert_eq!(book.display_title(), "Dune");
        assert_eq!(book.authors, vec!["Frank Herbert"]);
        assert_eq!(book.publication_year, Some(1965));
        assert_eq!(book.cover_id, Some(8231856));
        assert_eq!(book.subjects.len(), 2);
    }

    #[test]
    fn test_year_falls_back_to_publish_year() {
        let data = parse(r#"{"numFound": 1, "docs": [{"key": "k", "publish_year": [2001, 1999]}]}"#);
        let book = OpenLibrarySource::parse_book(data.docs.into_iter().next().unwrap());
        assert_eq!(book.publication_year, Some(2001));
    }

    #[test]
    fn test_missing_fields_default() {
        let data = parse("{}");
        assert_eq!(data.num_found, 0);
        assert!(data.docs.is_empty());
    }

    #[test]
    fn test_malformed_docs_treated_as_empty() {
        let data = parse(r#"{"numFound": 3, "docs": "nope"}"#);
        assert_eq!(data.num_found, 3);
        assert!(data.docs.is_empty());

        let data = parse(r#"{"numFound": null, "docs": null}"#);
        assert_eq!(data.num_found, 0);
        assert!(data.docs.is_empty());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let data = parse(r#"{"numFound": 2, "docs": [{"key": "a"}, 12, "x", {"key": "b"}]}"#);
        let keys: Vec<_> = data.docs.into_iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![Some("a".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn test_mistyped_field_keeps_the_book() {
        let data = parse(
            r#"{"numFound": 1, "docs": [{"key": "a", "title": 7, "author_name": "Frank Herbert", "first_publish_year": "1965"}]}"#,
        );
        assert_eq!(data.docs.len(), 1);

        let book = OpenLibrarySource::parse_book(data.docs.into_iter().next().unwrap());
        assert_eq!(book.key, "a");
        assert_eq!(book.display_title(), "Untitled");
        assert_eq!(book.display_authors(), "Unknown author");
        assert_eq!(book.display_year(), "—");
    }

    #[test]
    fn test_zero_cover_id_means_no_cover() {
        let data = parse(r#"{"numFound": 1, "docs": [{"key": "a", "cover_i": 0}]}"#);
        let book = OpenLibrarySource::parse_book(data.docs.into_iter().next().unwrap());
        assert_eq!(book.cover_id, None);
        assert_eq!(book.cover_url("https://covers.openlibrary.org"), None);
    }
}
