//! Output module for presenting crawl results
//!
//! This module handles:
//! - The end-of-crawl summary report
//! - Ranked search results
//! - Statistics about what the store holds

mod report;
mod search;
mod stats;

pub use report::{format_report, print_report};
pub use search::{format_search_results, print_search_results, render_stars};
pub use stats::{load_statistics, print_statistics, StoreStatistics};

/// Width of the banner rules around printed sections
const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
