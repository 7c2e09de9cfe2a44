//! Statistics about the page store
//!
//! This module reads back what previous crawls left in storage.

use crate::output::rule;
use crate::storage::{PageStore, RunLog, RunRecord, StorageResult};

/// Number of past runs shown by the stats mode
const RECENT_RUNS: usize = 5;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Number of pages currently stored
    pub total_pages: u64,

    /// Most recent crawl runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics<S>(storage: &S) -> StorageResult<StoreStatistics>
where
    S: PageStore + RunLog,
{
    Ok(StoreStatistics {
        total_pages: storage.count_pages()?,
        recent_runs: storage.latest_runs(RECENT_RUNS)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("{}", rule());
    println!("Stored pages: {}", stats.total_pages);
    println!("{}", rule());

    if stats.recent_runs.is_empty() {
        println!("No crawl runs recorded yet");
        return;
    }

    println!("Recent runs:");
    for run in &stats.recent_runs {
        println!(
            "  #{} {} started {} finished {}",
            run.id,
            run.status.to_db_string(),
            run.started_at,
            run.finished_at.as_deref().unwrap_or("-")
        );
        println!(
            "      attempted {} | saved {} | failed {}",
            run.stats.attempted, run.stats.succeeded, run.stats.failed
        );
    }
}
