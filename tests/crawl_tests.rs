//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the whole
//! pipeline (frontier, workers, sink, store) end-to-end.

use crawlstars::config::Config;
use crawlstars::crawler::{Crawler, WorkerExit};
use crawlstars::storage::{PageStore, SearchHit, SqliteStorage, StorageError, StorageResult};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(max_crawls: u64) -> Config {
    let mut config = Config::default();
    config.crawler.max_crawls = max_crawls;
    config.crawler.idle_timeout_ms = 300;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn memory_store() -> Arc<SqliteStorage> {
    Arc::new(SqliteStorage::open_in_memory().expect("in-memory store"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_small_site() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        200,
        html_page(
            "Home",
            r#"<p>Welcome to the home page of the test site.</p>
               <a href="/page1">Page 1</a>
               <a href="/page2">Page 2</a>
               <a href="mailto:owner@site.test">Mail</a>"#,
        ),
    )
    .await;
    mount_page(
        &server,
        "/page1",
        200,
        html_page(
            "Page 1",
            r#"<p>Astronomy facts about distant galaxies.</p><a href="/">Back home</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/page2", 404, "gone".to_string()).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    let store = Arc::new(SqliteStorage::open(&db_path).unwrap());
    let crawler = Crawler::new(&create_test_config(100), store.clone()).unwrap();
    let report = crawler.start(&format!("{}/", server.uri()), 3).await;
    drop(crawler);
    drop(store);

    assert_eq!(report.attempted, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert!(!report.stop_requested);
    assert_eq!(report.worker_exits.len(), 3);
    assert_eq!(report.exits_of(WorkerExit::IdleTimeout), 3);

    // Pages survive reopening the database
    let store = SqliteStorage::open(&db_path).unwrap();
    assert_eq!(store.count_pages().unwrap(), 2);

    let hits = store.search("galaxies", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Page 1");
    assert_eq!(hits[0].url, format!("{}/page1", server.uri()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_limit_triggered_stop() {
    let server = MockServer::start().await;
    for i in 0..5 {
        mount_page(
            &server,
            &format!("/p{}", i),
            200,
            html_page(&format!("P{}", i), "<p>A page without any outbound links.</p>"),
        )
        .await;
    }

    let store = memory_store();
    let crawler = Crawler::new(&create_test_config(1), store.clone()).unwrap();
    for i in 1..5 {
        assert!(crawler.seed(&format!("{}/p{}", server.uri(), i)));
    }

    let report = crawler.start(&format!("{}/p0", server.uri()), 4).await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(store.count_pages().unwrap(), 1);
    assert!(report.stop_requested);
    assert!(crawler.session().stop_requested());
    assert_eq!(report.attempted, 1);
    assert_eq!(report.exits_of(WorkerExit::LimitReached), 1);

    // Only the attempt inside the limit ever reached the network
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_limit_holds_when_discovered_links_wake_idle_workers() {
    let server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/link{}">Link</a>"#, i))
        .collect();
    mount_page(&server, "/", 200, html_page("Fan-out", &links)).await;
    for i in 0..20 {
        mount_page(
            &server,
            &format!("/link{}", i),
            200,
            html_page("Link", "<p>A page reached from the fan-out.</p>"),
        )
        .await;
    }

    let workers = 4;
    for _ in 0..5 {
        let store = memory_store();
        let crawler = Crawler::new(&create_test_config(1), store.clone()).unwrap();
        let report = crawler.start(&format!("{}/", server.uri()), workers).await;

        // Idle workers all wake on the seed's links; none may count past the limit
        assert!(report.attempted <= 1 + (workers as u64 - 1));
        assert_eq!(report.attempted, 1);
        assert_eq!(report.succeeded, 1);
        assert!(report.stop_requested);
        assert_eq!(report.exits_of(WorkerExit::LimitReached), 1);
        assert_eq!(store.count_pages().unwrap(), 1);
    }

    // Five crawls, one fetch each
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_idle_shutdown() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        200,
        html_page("Lonely", "<p>This page links nowhere at all.</p>"),
    )
    .await;

    let store = memory_store();
    let crawler = Crawler::new(&create_test_config(100), store.clone()).unwrap();
    let report = crawler.start(&format!("{}/", server.uri()), 3).await;

    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
    assert!(!report.stop_requested);
    assert_eq!(report.exits_of(WorkerExit::IdleTimeout), 3);
    assert_eq!(report.exits_of(WorkerExit::LimitReached), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(
            "Hub",
            r#"<a href="/">Self</a><a href="/a">A</a><a href="/a">A again</a>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(
            "A",
            r#"<a href="/">Hub</a><a href="/a">Self</a>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let store = memory_store();
    let crawler = Crawler::new(&create_test_config(100), store.clone()).unwrap();
    let report = crawler.start(&format!("{}/", server.uri()), 4).await;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(crawler.visited().len(), 2);
    // Mock expectations are verified when the server drops
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_frontier_drops_links() {
    let server = MockServer::start().await;

    let links: String = (0..5)
        .map(|i| format!(r#"<a href="/leaf{}">Leaf</a>"#, i))
        .collect();
    mount_page(&server, "/", 200, html_page("Root", &links)).await;
    for i in 0..5 {
        mount_page(
            &server,
            &format!("/leaf{}", i),
            200,
            html_page("Leaf", "<p>Leaf page body text.</p>"),
        )
        .await;
    }

    let mut config = create_test_config(100);
    config.crawler.frontier_capacity = 1;

    let store = memory_store();
    let crawler = Crawler::new(&config, store.clone()).unwrap();
    let report = crawler.start(&format!("{}/", server.uri()), 1).await;

    // The root plus the single link that fit
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(store.count_pages().unwrap(), 2);
}

/// Store that refuses every write
struct FailingStore;

impl PageStore for FailingStore {
    fn upsert_page(&self, _url: &str, _title: &str, _content: &str) -> StorageResult<()> {
        Err(StorageError::Connect("store is down".to_string()))
    }

    fn search(&self, _query: &str, _limit: usize) -> StorageResult<Vec<SearchHit>> {
        Ok(Vec::new())
    }

    fn count_pages(&self) -> StorageResult<u64> {
        Ok(0)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_persistence_failure_is_counted() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        200,
        html_page("Doomed", r#"<p>Nobody will store this page.</p><a href="/next">Next</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/next",
        200,
        html_page("Next", "<p>Nor this one, sadly.</p>"),
    )
    .await;

    let crawler = Crawler::new(&create_test_config(100), Arc::new(FailingStore)).unwrap();
    let report = crawler.start(&format!("{}/", server.uri()), 2).await;

    // Storage failures do not stop discovery
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_title_fallback_is_persisted() {
    let server = MockServer::start().await;
    let body = "<p>This body has plenty of text but the document carries no title element whatsoever.</p>";
    mount_page(
        &server,
        "/",
        200,
        format!("<html><body>{}</body></html>", body),
    )
    .await;

    let store = memory_store();
    let crawler = Crawler::new(&create_test_config(10), store.clone()).unwrap();
    crawler.start(&format!("{}/", server.uri()), 1).await;

    let hits = store.search("whatsoever", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(
        hits[0].title,
        "This body has plenty of text but the document carr..."
    );
}
