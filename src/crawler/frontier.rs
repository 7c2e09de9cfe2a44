//! Bounded frontier of URLs waiting for a fetch attempt
//!
//! Producers never wait: `try_enqueue` drops the URL when the frontier is at
//! capacity. Consumers wait for an item up to a timeout. Items live in a
//! `VecDeque` behind a mutex and a semaphore counts how many are available, so
//! a waiting consumer is woken exactly when something is pushed.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Bounded FIFO queue of discovered-but-unprocessed URLs
#[derive(Debug)]
pub struct Frontier {
    queue: Mutex<VecDeque<String>>,
    available: Semaphore,
    capacity: usize,
}

impl Frontier {
    /// Creates an empty frontier holding at most `capacity` URLs
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Semaphore::new(0),
            capacity,
        }
    }

    /// Offers a URL without blocking
    ///
    /// Returns `false`, dropping the URL, when the frontier is full.
    pub fn try_enqueue(&self, url: impl Into<String>) -> bool {
        {
            let mut queue = self.lock();
            if queue.len() >= self.capacity {
                return false;
            }
            queue.push_back(url.into());
        }
        self.available.add_permits(1);
        true
    }

    /// Waits up to `timeout` for the next URL
    ///
    /// Returns `None` when nothing arrived in time, which tells the caller to
    /// stop consuming.
    pub async fn dequeue(&self, timeout: Duration) -> Option<String> {
        let permit = tokio::time::timeout(timeout, self.available.acquire())
            .await
            .ok()?
            .ok()?;
        // One permit per queued item; the item is ours now
        permit.forget();
        self.lock().pop_front()
    }

    /// Number of URLs currently waiting
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
