//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Book, BookBuilder, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};

/// A request the mock source received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub title: String,
    pub page: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone)]
struct Script {
    outcome: Result<SearchResponse, SourceError>,
    delay: Duration,
}

/// A mock source that serves scripted pages keyed by `(title, page)`.
///
/// Unscripted queries resolve to an empty page. Each script may carry a delay,
/// which lets tests force responses to arrive out of order.
#[derive(Debug, Default)]
pub struct MockSource {
    scripts: Mutex<HashMap<(String, usize), Script>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `title` at `page`.
    pub fn set_page(&self, title: &str, page: usize, response: SearchResponse) {
        self.set_page_with_delay(title, page, response, Duration::ZERO);
    }

    /// Serve `response` for `title` at `page` after `delay`.
    pub fn set_page_with_delay(
        &self,
        title: &str,
        page: usize,
        response: SearchResponse,
        delay: Duration,
    ) {
        self.script(title, page, Ok(response), delay);
    }

    /// Fail requests for `title` at `page` with `error`.
    pub fn set_failure(&self, title: &str, page: usize, error: SourceError) {
        self.script(title, page, Err(error), Duration::ZERO);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn script(
        &self,
        title: &str,
        page: usize,
        outcome: Result<SearchResponse, SourceError>,
        delay: Duration,
    ) {
        self.scripts
            .lock()
            .unwrap()
            .insert((title.to_string(), page), Script { outcome, delay });
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            title: query.title.clone(),
            page: query.page,
            limit: query.limit,
            offset: query.offset(),
        });

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&(query.title.clone(), query.page))
            .cloned();

        match script {
            Some(script) => {
                if !script.delay.is_zero() {
                    tokio::time::sleep(script.delay).await;
                }
                script.outcome
            }
            None => Ok(SearchResponse::empty(&query.title, query.page)),
        }
    }
}

/// Helper function to create a mock book for testing.
pub fn make_book(key: &str, title: &str) -> Book {
    BookBuilder::new(key).title(title).build()
}

/// Helper to build a page of `count` numbered books reporting `total` matches.
pub fn make_page(title: &str, page: usize, count: usize, total: usize) -> SearchResponse {
    let books = (0..count)
        .map(|i| make_book(&format!("/works/{}-{}-{}", title, page, i), &format!("{} #{}", title, i)))
        .collect();
    SearchResponse::new(books, title, page).total_results(total)
}
