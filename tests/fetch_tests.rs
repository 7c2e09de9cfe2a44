//! HTTP fetcher tests against a mock server

use crawlstars::config::{CrawlerConfig, UserAgentConfig};
use crawlstars::crawler::{build_http_client, FetchError, PageFetcher};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn default_fetcher() -> PageFetcher {
    PageFetcher::from_config(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_page_parses_response() {
    let server = MockServer::start().await;
    let html = r#"<html>
        <head><title>  Rust Crawler  </title></head>
        <body>
            <p>Fetching pages concurrently with async workers.</p>
            <a href="/docs">Docs</a>
            <a href="https://other.test/page">Other</a>
            <a href="ftp://files.test/archive">Archive</a>
        </body>
    </html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/", server.uri());
    let page = default_fetcher().fetch_page(&url).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.title, "Rust Crawler");
    assert!(page
        .content
        .contains("Fetching pages concurrently with async workers."));
    assert_eq!(
        page.links,
        vec![
            format!("{}/docs", server.uri()),
            "https://other.test/page".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;
    let user_agent = UserAgentConfig::default();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", user_agent.header_value().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = PageFetcher::from_config(&CrawlerConfig::default(), &user_agent).unwrap();
    let page = fetcher
        .fetch_page(&format!("{}/", server.uri()))
        .await
        .unwrap();

    // An empty document is still a successful fetch
    assert_eq!(page.title, "");
    assert_eq!(page.content, "");
    assert!(page.links.is_empty());
}

#[tokio::test]
async fn test_non_success_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = default_fetcher();

    let result = fetcher
        .fetch_page(&format!("{}/missing", server.uri()))
        .await;
    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));

    let result = fetcher
        .fetch_page(&format!("{}/broken", server.uri()))
        .await;
    assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><title>Late</title></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client =
        build_http_client(&UserAgentConfig::default(), Duration::from_millis(200)).unwrap();
    let fetcher = PageFetcher::new(client);

    let result = fetcher.fetch_page(&format!("{}/slow", server.uri())).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Port 9 (discard) on localhost is expected to refuse connections
    let result = default_fetcher().fetch_page("http://127.0.0.1:9/").await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
}
