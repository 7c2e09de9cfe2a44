//! Ranked search result rendering

use crate::storage::SearchHit;
use std::fmt::Write;

/// Renders a star rating such as `★★★☆☆ 3.4`
pub fn render_stars(stars: f64) -> String {
    let filled = (stars.round().max(0.0) as usize).min(5);
    format!(
        "{}{} {:.1}",
        "★".repeat(filled),
        "☆".repeat(5 - filled),
        stars
    )
}

pub fn format_search_results(query: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();

    if hits.is_empty() {
        let _ = writeln!(out, "No results for \"{}\"", query);
        return out;
    }

    let _ = writeln!(out, "Results for \"{}\" ({}):\n", query, hits.len());
    for (rank, hit) in hits.iter().enumerate() {
        let _ = writeln!(out, "{}. {}  {}", rank + 1, hit.title, render_stars(hit.stars));
        let _ = writeln!(out, "   {}", hit.url);
        if !hit.snippet.is_empty() {
            let _ = writeln!(out, "   {}", hit.snippet);
        }
        let _ = writeln!(out);
    }

    out
}

/// Prints search results to stdout
pub fn print_search_results(query: &str, hits: &[SearchHit]) {
    print!("{}", format_search_results(query, hits));
}
