//! Observation store — per-metric sliding windows with dual eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use tracing::debug;

use foresight_core::config::ObservationConfig;
use foresight_core::types::Observation;

/// Thread-safe store of recent samples, one bounded window per metric.
///
/// Windows are ordered oldest-first and monotonically non-decreasing in
/// timestamp. Eviction applies both bounds on every insert: samples older
/// than `retention_secs` relative to the newest sample, and samples beyond
/// `max_samples`, whichever trims more.
pub struct ObservationStore {
    windows: RwLock<HashMap<String, VecDeque<Observation>>>,
    max_samples: usize,
    retention_secs: u64,
}

impl ObservationStore {
    /// Create a store with the given window bounds.
    pub fn new(config: &ObservationConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            max_samples: config.max_samples.max(1),
            retention_secs: config.retention_secs,
        }
    }

    /// Record a sample. Never fails.
    ///
    /// A timestamp older than the window's newest sample is clamped up to
    /// it, so windows stay sorted even when producers race.
    pub fn record(&self, metric: &str, value: f64, timestamp: u64) {
        let mut windows = self.windows.write().expect("observation lock poisoned");
        let window = windows.entry(metric.to_string()).or_default();

        let timestamp = match window.back() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };

        window.push_back(Observation {
            metric: metric.to_string(),
            value,
            timestamp,
        });

        let evicted = Self::evict(window, self.max_samples, self.retention_secs);
        if evicted > 0 {
            debug!(%metric, evicted, retained = window.len(), "window trimmed");
        }
    }

    /// Current retained samples for a metric, oldest-first.
    ///
    /// Unknown metrics return an empty vector.
    pub fn window(&self, metric: &str) -> Vec<Observation> {
        let windows = self.windows.read().expect("observation lock poisoned");
        windows
            .get(metric)
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Metric names currently holding at least one sample.
    pub fn metrics(&self) -> Vec<String> {
        let windows = self.windows.read().expect("observation lock poisoned");
        windows.keys().cloned().collect()
    }

    /// Drop a metric's window entirely.
    pub fn clear(&self, metric: &str) {
        let mut windows = self.windows.write().expect("observation lock poisoned");
        windows.remove(metric);
    }

    /// Apply both bounds; returns the number of samples evicted.
    fn evict(window: &mut VecDeque<Observation>, max_samples: usize, retention_secs: u64) -> usize {
        let mut evicted = 0;

        while window.len() > max_samples {
            window.pop_front();
            evicted += 1;
        }

        if let Some(newest) = window.back().map(|o| o.timestamp) {
            let cutoff = newest.saturating_sub(retention_secs);
            while window.front().is_some_and(|o| o.timestamp < cutoff) {
                window.pop_front();
                evicted += 1;
            }
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_samples: usize, retention_secs: u64) -> ObservationStore {
        ObservationStore::new(&ObservationConfig {
            max_samples,
            retention_secs,
        })
    }

    #[test]
    fn record_and_read_back() {
        let store = store(10, 3600);
        store.record("error_rate_percent", 1.0, 100);
        store.record("error_rate_percent", 2.0, 160);

        let window = store.window("error_rate_percent");
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].value, 1.0);
        assert_eq!(window[1].value, 2.0);
    }

    #[test]
    fn unknown_metric_is_empty() {
        let store = store(10, 3600);
        assert!(store.window("nope").is_empty());
    }

    #[test]
    fn count_bound_evicts_oldest_first() {
        let store = store(3, 3600);
        for i in 0..5u64 {
            store.record("latency_p99_ms", i as f64, 100 + i * 60);
        }

        let window = store.window("latency_p99_ms");
        assert_eq!(window.len(), 3);
        // Oldest two dropped.
        assert_eq!(window[0].value, 2.0);
        assert_eq!(window[2].value, 4.0);
    }

    #[test]
    fn age_bound_evicts_relative_to_newest() {
        let store = store(100, 120);
        store.record("memory_used_mb", 1.0, 100);
        store.record("memory_used_mb", 2.0, 160);
        // Newest at t=400 puts the cutoff at t=280; both earlier samples go.
        store.record("memory_used_mb", 3.0, 400);

        let window = store.window("memory_used_mb");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].value, 3.0);
    }

    #[test]
    fn out_of_order_timestamp_is_clamped() {
        let store = store(10, 3600);
        store.record("error_rate_percent", 1.0, 200);
        store.record("error_rate_percent", 2.0, 150);

        let window = store.window("error_rate_percent");
        assert_eq!(window[1].timestamp, 200);
        // Monotonically non-decreasing.
        assert!(window.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn metrics_lists_known_names() {
        let store = store(10, 3600);
        store.record("a", 1.0, 100);
        store.record("b", 1.0, 100);

        let mut names = store.metrics();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn clear_removes_window() {
        let store = store(10, 3600);
        store.record("a", 1.0, 100);
        store.clear("a");
        assert!(store.window("a").is_empty());
        assert!(store.metrics().is_empty());
    }

    #[test]
    fn concurrent_producers_and_reader() {
        use std::sync::Arc;

        let store = Arc::new(store(1000, 3600));
        let mut handles = Vec::new();
        for p in 0..4u64 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..100u64 {
                    store.record("error_rate_percent", i as f64, 1000 + p * 100 + i);
                }
            }));
        }
        // Reader races the producers; windows must always be sorted.
        for _ in 0..50 {
            let window = store.window("error_rate_percent");
            assert!(window.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.window("error_rate_percent").len(), 400);
    }
}
