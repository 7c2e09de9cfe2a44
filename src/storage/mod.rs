//! Storage module for persisting crawled pages
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent page upserts keyed by URL
//! - Ranked full-text search over stored pages
//! - Crawl run bookkeeping

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{PageStore, RunLog, StorageError, StorageResult};

/// Default number of hits returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Number of content characters kept in a search snippet
pub const SNIPPET_CHARS: usize = 100;

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Raw relevance score (higher is better)
    pub score: f64,
    /// Relevance relative to the best hit, between 1.0 and 5.0
    pub stars: f64,
    pub snippet: String,
}

/// Final counters of a crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub stats: RunStats,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Builds a snippet from page content: the first 100 characters, followed by
/// `...` when the content is longer
pub fn make_snippet(content: &str) -> String {
    if content.chars().count() > SNIPPET_CHARS {
        let mut snippet: String = content.chars().take(SNIPPET_CHARS).collect();
        snippet.push_str("...");
        snippet
    } else {
        content.to_string()
    }
}

/// Converts a score into a 1-5 star rating relative to the best score
pub fn star_rating(score: f64, best: f64) -> f64 {
    if best <= 0.0 {
        return 5.0;
    }
    (score / best * 5.0).max(1.0)
}
