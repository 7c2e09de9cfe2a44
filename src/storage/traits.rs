//! Storage traits and error types
//!
//! This module defines the persistence boundary the crawler writes to and the
//! search boundary that later reads back what was stored.

use crate::storage::{RunRecord, RunStats, SearchHit};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to page store: {0}")]
    Connect(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence and search boundary for crawled pages
///
/// Implementations must be safe to share between the sink task and readers.
/// `upsert_page` must be idempotent by URL: writing the same URL twice leaves
/// exactly one stored page holding the latest title and content.
pub trait PageStore: Send + Sync {
    /// Inserts a page, or replaces the title and content of an existing one
    fn upsert_page(&self, url: &str, title: &str, content: &str) -> StorageResult<()>;

    /// Runs a free-text query and returns at most `limit` ranked hits
    ///
    /// Hits are ordered by descending relevance. The best hit always carries
    /// five stars; others are scaled against it with a floor of one star.
    fn search(&self, query: &str, limit: usize) -> StorageResult<Vec<SearchHit>>;

    /// Returns the number of stored pages
    fn count_pages(&self) -> StorageResult<u64>;
}

/// Bookkeeping of crawl runs
pub trait RunLog {
    /// Records the start of a crawl run and returns its ID
    fn create_run(&self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as finished with its final counters
    fn complete_run(&self, run_id: i64, stats: &RunStats) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Returns up to `limit` runs, most recent first
    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;
}
