//! Concurrent record of every URL a worker has dequeued

use dashmap::DashSet;

/// Append-only set of visited URLs, safe to share between workers
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `url` has been marked
    pub fn is_visited(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks `url` as visited
    ///
    /// Returns `true` if this call inserted it and `false` if it was already
    /// present. Of several workers racing on the same URL exactly one sees
    /// `true`, since `DashSet::insert` reports whether the value was new.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_mark_then_visited() {
        let visited = VisitedSet::new();
        assert!(!visited.is_visited("https://a.test/"));

        assert!(visited.mark_visited("https://a.test/"));
        assert!(visited.is_visited("https://a.test/"));

        // Marking again keeps it visited and reports it was already there
        assert!(!visited.mark_visited("https://a.test/"));
        assert!(visited.is_visited("https://a.test/"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_urls_are_not_normalized() {
        let visited = VisitedSet::new();
        visited.mark_visited("https://a.test/page");
        assert!(!visited.is_visited("https://a.test/page/"));
        assert!(!visited.is_visited("https://A.test/page"));
    }

    #[test]
    fn test_only_one_racer_wins() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = visited.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    if visited.mark_visited("https://contested.test/") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert!(visited.is_visited("https://contested.test/"));
    }
}
