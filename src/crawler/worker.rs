//! Crawl worker: the per-task control loop
//!
//! Each worker repeats: dequeue, dedup, count the attempt, fetch, emit,
//! discover. An attempt the crawl limit refuses is never counted or fetched. The stop flag is checked at the top of the loop and right after
//! a page is emitted, never during a fetch, so an in-flight request always
//! runs to completion (or to its timeout) first.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::Page;
use crate::crawler::session::CrawlSession;
use crate::crawler::visited::VisitedSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Why a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerExit {
    /// Saw the stop flag raised by another worker
    StopRequested,
    /// Was the first to be refused an attempt by the crawl limit and raised the flag
    LimitReached,
    /// The frontier stayed empty for the whole idle timeout
    IdleTimeout,
    /// The result sink went away, so nothing more could be delivered
    SinkClosed,
}

/// State shared by every worker of one crawl
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub visited: Arc<VisitedSet>,
    pub session: Arc<CrawlSession>,
    pub fetcher: PageFetcher,
    pub max_crawls: u64,
    pub idle_timeout: Duration,
}

pub(crate) struct Worker {
    id: usize,
    ctx: WorkerContext,
    results: mpsc::Sender<Page>,
}

impl Worker {
    pub fn new(id: usize, ctx: WorkerContext, results: mpsc::Sender<Page>) -> Self {
        Self { id, ctx, results }
    }

    pub async fn run(self) -> WorkerExit {
        let id = self.id;
        let ctx = &self.ctx;

        loop {
            if ctx.session.stop_requested() {
                tracing::debug!("[Worker {}] Stop signal received, shutting down", id);
                return WorkerExit::StopRequested;
            }

            let url = match ctx.frontier.dequeue(ctx.idle_timeout).await {
                Some(url) => url,
                None => {
                    tracing::info!(
                        "[Worker {}] Queue empty for {:?}, quitting",
                        id,
                        ctx.idle_timeout
                    );
                    return WorkerExit::IdleTimeout;
                }
            };

            if !ctx.visited.mark_visited(&url) {
                continue;
            }

            let count = match ctx.session.try_record_attempt(ctx.max_crawls) {
                Some(count) => count,
                None => {
                    if ctx.session.request_stop() {
                        tracing::info!(
                            "[Worker {}] Reached max crawls ({}), initiating shutdown",
                            id,
                            ctx.max_crawls
                        );
                        return WorkerExit::LimitReached;
                    }
                    tracing::debug!("[Worker {}] Crawl limit already reached, shutting down", id);
                    return WorkerExit::StopRequested;
                }
            };

            let mut page = match ctx.fetcher.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    ctx.session.record_failure();
                    tracing::warn!("Count: {} | [Worker {}] Failed: {}", count, id, e);
                    continue;
                }
            };

            tracing::info!(
                "Count: {} | [Worker {}] Crawled: {} | \"{}\"",
                count,
                id,
                url,
                page.title
            );

            let links = std::mem::take(&mut page.links);

            // Blocks while the sink is behind; completed pages are never dropped
            if self.results.send(page).await.is_err() {
                tracing::error!("[Worker {}] Result sink closed, stopping", id);
                return WorkerExit::SinkClosed;
            }

            if ctx.session.stop_requested() {
                tracing::debug!("[Worker {}] Stop signal received after emit", id);
                return WorkerExit::StopRequested;
            }

            let mut dropped = 0usize;
            for link in links {
                if !ctx.visited.is_visited(&link) && !ctx.frontier.try_enqueue(link) {
                    dropped += 1;
                }
            }
            if dropped > 0 {
                tracing::debug!(
                    "[Worker {}] Frontier full, dropped {} links from {}",
                    id,
                    dropped,
                    url
                );
            }
        }
    }
}
