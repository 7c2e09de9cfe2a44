//! Crawler module for concurrent page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The bounded frontier and the visited set
//! - HTTP fetching and HTML parsing
//! - The worker pool and its stop/idle rules
//! - The result sink and two-phase shutdown

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod session;
mod sink;
mod visited;
mod worker;

pub use coordinator::{CrawlReport, Crawler};
pub use fetcher::{build_http_client, FetchError, PageFetcher};
pub use frontier::Frontier;
pub use parser::{fallback_title, parse_html, Page, ParsedPage, CONTENT_LIMIT};
pub use session::CrawlSession;
pub use sink::ResultSink;
pub use visited::VisitedSet;
pub use worker::WorkerExit;
