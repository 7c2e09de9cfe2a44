//! CrawlStars: a breadth-first web crawler feeding a searchable page store
//!
//! This crate crawls the web from a seed URL with a fixed pool of workers,
//! extracts page text and outbound links, and persists completed pages to a
//! SQLite store that supports ranked full-text search.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Errors that keep a crawl from starting
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, Page, WorkerExit};
pub use storage::{PageStore, SearchHit, SqliteStorage};
