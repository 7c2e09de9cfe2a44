//! Crawler coordinator - crawl orchestration and two-phase shutdown
//!
//! This module owns the shared crawl state and runs a crawl to completion:
//! 1. Seed the frontier
//! 2. Launch the result sink
//! 3. Launch the worker pool
//! 4. Wait for every worker to finish
//! 5. Close the result channel so the sink sees end-of-input
//! 6. Wait for the sink to drain
//! 7. Report duration, counters and throughput
//!
//! Workers must all be gone before the channel closes, and the sink must be
//! drained before the report is built; otherwise completed pages could be lost.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::session::CrawlSession;
use crate::crawler::sink::ResultSink;
use crate::crawler::visited::VisitedSet;
use crate::crawler::worker::{Worker, WorkerContext, WorkerExit};
use crate::storage::{PageStore, RunStats};
use crate::CrawlError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub duration: Duration,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Whether the crawl limit was hit
    pub stop_requested: bool,
    /// How each worker terminated, in worker order
    pub worker_exits: Vec<WorkerExit>,
}

impl CrawlReport {
    /// Saved pages per second, when any time has elapsed
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            Some(self.succeeded as f64 / secs)
        } else {
            None
        }
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            attempted: self.attempted,
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }

    /// Number of workers that ended with the given exit
    pub fn exits_of(&self, exit: WorkerExit) -> usize {
        self.worker_exits.iter().filter(|e| **e == exit).count()
    }
}

/// Main crawler structure
///
/// A `Crawler` holds one crawl session: its frontier, visited set and
/// counters persist across calls, so run it once per crawl.
pub struct Crawler<S: PageStore + ?Sized> {
    config: CrawlerConfig,
    store: Arc<S>,
    fetcher: PageFetcher,
    frontier: Arc<Frontier>,
    visited: Arc<VisitedSet>,
    session: Arc<CrawlSession>,
}

impl<S: PageStore + ?Sized + 'static> Crawler<S> {
    /// Creates a crawler writing to `store`
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to start
    /// * `Err(CrawlError::Http)` - The HTTP client could not be built
    /// * `Err(CrawlError::Storage)` - The store does not answer
    pub fn new(config: &Config, store: Arc<S>) -> Result<Self, CrawlError> {
        let fetcher = PageFetcher::from_config(&config.crawler, &config.user_agent)?;

        // A crawl whose pages cannot be saved must not start
        let stored = store.count_pages()?;
        tracing::debug!("Page store reachable, {} pages already stored", stored);

        Ok(Self::with_fetcher(config.crawler.clone(), store, fetcher))
    }

    /// Creates a crawler with an already configured fetcher
    pub fn with_fetcher(config: CrawlerConfig, store: Arc<S>, fetcher: PageFetcher) -> Self {
        let frontier = Arc::new(Frontier::new(config.frontier_capacity));
        Self {
            config,
            store,
            fetcher,
            frontier,
            visited: Arc::new(VisitedSet::new()),
            session: Arc::new(CrawlSession::new()),
        }
    }

    /// Adds a URL to the frontier ahead of `start`
    ///
    /// Returns `false` if the frontier is full.
    pub fn seed(&self, url: &str) -> bool {
        self.frontier.try_enqueue(url)
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Crawls from `seed_url` with `workers` concurrent workers until every
    /// worker has stopped, then returns the final report
    pub async fn start(&self, seed_url: &str, workers: usize) -> CrawlReport {
        let workers = workers.max(1);
        let start_time = Instant::now();

        tracing::info!("Liftoff! Starting crawl at: {}", seed_url);
        tracing::info!(
            "Workers: {} | Max Crawls: {}",
            workers,
            self.config.max_crawls
        );

        if !self.seed(seed_url) {
            tracing::warn!("Frontier full, seed {} was not queued", seed_url);
        }

        let (results_tx, results_rx) = mpsc::channel(self.config.result_buffer);

        let sink = ResultSink::new(self.store.clone(), self.session.clone());
        let sink_handle = tokio::spawn(sink.run(results_rx));

        let ctx = WorkerContext {
            frontier: self.frontier.clone(),
            visited: self.visited.clone(),
            session: self.session.clone(),
            fetcher: self.fetcher.clone(),
            max_crawls: self.config.max_crawls,
            idle_timeout: self.config.idle_timeout(),
        };

        let handles: Vec<_> = (0..workers)
            .map(|id| tokio::spawn(Worker::new(id, ctx.clone(), results_tx.clone()).run()))
            .collect();

        let mut worker_exits = Vec::with_capacity(workers);
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(exit) => worker_exits.push(exit),
                Err(e) => tracing::error!("[Worker {}] terminated abnormally: {}", id, e),
            }
        }

        // Every worker is gone; dropping the last sender lets the sink finish
        drop(results_tx);

        if let Err(e) = sink_handle.await {
            tracing::error!("Result sink terminated abnormally: {}", e);
        }

        let report = CrawlReport {
            duration: start_time.elapsed(),
            attempted: self.session.attempted(),
            succeeded: self.session.succeeded(),
            failed: self.session.failed(),
            stop_requested: self.session.stop_requested(),
            worker_exits,
        };

        tracing::info!(
            "Crawl completed: {} attempted, {} saved, {} failed in {:?}",
            report.attempted,
            report.succeeded,
            report.failed,
            report.duration
        );

        report
    }
}
