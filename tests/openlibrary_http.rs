//! HTTP-level tests for the Open Library source against a local mock server.

use book_finder::models::SearchQuery;
use book_finder::sources::{OpenLibrarySource, Source, SourceError};
use book_finder::utils::HttpClient;
use mockito::Matcher;

const DUNE_BODY: &str = r#"{
    "numFound": 45,
    "docs": [
        {
            "key": "/works/OL893415W",
            "title": "Dune",
            "author_name": ["Frank Herbert"],
            "first_publish_year": 1965,
            "cover_i": 8231856,
            "subject": ["Science fiction", "Arrakis", "Deserts", "Ecology", "Politics", "Religion"]
        },
        { "key": "/works/OL2W" }
    ]
}"#;

fn source_for(server: &mockito::ServerGuard) -> OpenLibrarySource {
    OpenLibrarySource::with_endpoint(HttpClient::new(), format!("{}/search.json", server.url()))
}

#[tokio::test]
async fn test_search_sends_title_limit_offset() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "Dune Messiah".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("offset".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DUNE_BODY)
        .create_async()
        .await;

    let source = source_for(&server);
    let response = source
        .search(&SearchQuery::new("Dune Messiah").page(2))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.total_results, 45);
    assert_eq!(response.page, 2);
    assert_eq!(response.books.len(), 2);

    let dune = &response.books[0];
    assert_eq!(dune.display_title(), "Dune");
    assert_eq!(dune.display_authors(), "Frank Herbert");
    assert_eq!(dune.display_year(), "1965");
    assert_eq!(dune.tags().len(), 5);
    assert_eq!(
        dune.cover_url("https://covers.openlibrary.org").as_deref(),
        Some("https://covers.openlibrary.org/b/id/8231856-M.jpg")
    );

    let bare = &response.books[1];
    assert_eq!(bare.display_title(), "Untitled");
    assert_eq!(bare.display_authors(), "Unknown author");
    assert_eq!(bare.display_year(), "—");
    assert_eq!(bare.cover_url("https://covers.openlibrary.org"), None);
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = source_for(&server)
        .search(&SearchQuery::new("Dune"))
        .await
        .unwrap_err();

    assert_eq!(err, SourceError::Api { status: 500 });
    assert_eq!(err.user_message(), "Failed to fetch results. Try again.");
}

#[tokio::test]
async fn test_unparseable_body_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = source_for(&server)
        .search(&SearchQuery::new("Dune"))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_missing_fields_yield_empty_page() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let response = source_for(&server)
        .search(&SearchQuery::new("Dune"))
        .await
        .unwrap();

    assert!(response.books.is_empty());
    assert_eq!(response.total_results, 0);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // nothing listens on port 9 (discard) on test machines
    let source = OpenLibrarySource::with_endpoint(HttpClient::new(), "http://127.0.0.1:9/search.json");
    let err = source.search(&SearchQuery::new("Dune")).await.unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)));
}
