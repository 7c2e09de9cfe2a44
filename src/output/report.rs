//! End-of-crawl summary

use crate::crawler::{CrawlReport, WorkerExit};
use crate::output::rule;
use std::fmt::Write;

/// Renders the crawl summary shown once every worker and the sink are done
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", rule());
    let _ = writeln!(out, "CRAWL COMPLETE! Here's what went down:");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Duration:           {}s", report.duration.as_secs());
    let _ = writeln!(out, "Total Attempted:    {} pages", report.attempted);
    let _ = writeln!(out, "Successfully Saved: {} pages", report.succeeded);
    let _ = writeln!(out, "Failed:             {} pages", report.failed);

    if let Some(rate) = report.throughput() {
        let _ = writeln!(out, "Crawl Speed:        {:.2} pages/second", rate);
    }

    let stop_reason = if report.stop_requested {
        "crawl limit reached"
    } else {
        "frontier went idle"
    };
    let _ = writeln!(out, "Stopped Because:    {}", stop_reason);

    let idle = report.exits_of(WorkerExit::IdleTimeout);
    let stopped =
        report.exits_of(WorkerExit::StopRequested) + report.exits_of(WorkerExit::LimitReached);
    let _ = writeln!(
        out,
        "Workers:            {} idle, {} stopped",
        idle, stopped
    );

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Data is now searchable with --search <QUERY>");
    let _ = writeln!(out, "{}", rule());

    out
}

/// Prints the crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", format_report(report));
}
