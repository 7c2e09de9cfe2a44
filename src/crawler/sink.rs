//! Result sink: persists completed pages and tallies outcomes
//!
//! The sink drains a bounded channel until every sender is gone and the
//! buffer is empty. Each page gets exactly one upsert; a failed upsert is
//! counted and logged, never retried.

use crate::crawler::parser::Page;
use crate::crawler::session::CrawlSession;
use crate::storage::PageStore;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Consumer side of the worker-to-store handoff
pub struct ResultSink<S: ?Sized> {
    store: Arc<S>,
    session: Arc<CrawlSession>,
}

impl<S: PageStore + ?Sized> ResultSink<S> {
    pub fn new(store: Arc<S>, session: Arc<CrawlSession>) -> Self {
        Self { store, session }
    }

    /// Consumes pages until the channel is closed and drained
    ///
    /// Returns the number of pages received.
    pub async fn run(self, mut results: mpsc::Receiver<Page>) -> u64 {
        let mut received = 0;
        while let Some(page) = results.recv().await {
            received += 1;
            self.persist(&page);
        }
        tracing::debug!("Result sink drained after {} pages", received);
        received
    }

    /// Writes one page and records the outcome
    pub fn persist(&self, page: &Page) {
        match self.store.upsert_page(&page.url, &page.title, &page.content) {
            Ok(()) => {
                self.session.record_success();
            }
            Err(e) => {
                self.session.record_failure();
                tracing::error!("Failed to save page {}: {}", page.url, e);
            }
        }
    }
}
