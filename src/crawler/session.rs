//! Shared crawl counters and the global stop flag
//!
//! Each counter and the flag are independent atomics; no operation needs two
//! of them to change together. The attempt counter is bounded: it never moves
//! past the crawl limit, however many workers race on it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counters and stop signal shared by all workers and the sink
#[derive(Debug, Default)]
pub struct CrawlSession {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    stop_requested: AtomicBool,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a fetch attempt if the limit allows one more
    ///
    /// Returns the attempt's 1-based ordinal, or `None` once `max` attempts
    /// have been counted. A refused attempt leaves the counter untouched.
    pub fn try_record_attempt(&self, max: u64) -> Option<u64> {
        self.attempted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then(|| n + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    pub fn record_success(&self) -> u64 {
        self.succeeded.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Raises the stop flag. Once set it never clears.
    ///
    /// Returns `true` only for the call that raised it.
    pub fn request_stop(&self) -> bool {
        !self.stop_requested.swap(true, Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::SeqCst)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}
