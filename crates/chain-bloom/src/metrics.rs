//! Metrics hooks for filter operations
//!
//! ## Usage
//!
//! ```ignore
//! use chain_bloom::metrics::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = RemoteBloomFilter::new(config, store)?.with_metrics(metrics.clone());
//!
//! filter.set("users", "alice").await?;
//! assert_eq!(metrics.snapshot().elements_inserted, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for filter operations
///
/// Thread-safe counters shared by any number of filters.
#[derive(Default)]
pub struct Metrics {
    /// Successful `set` calls
    pub elements_inserted: AtomicU64,
    /// Successful `exist` calls
    pub lookups_performed: AtomicU64,
    /// `exist` calls that answered true
    pub lookups_positive: AtomicU64,
    /// Calls that failed in the store or returned an unexpected reply
    pub store_errors: AtomicU64,
    /// Cumulative insert time in nanoseconds
    pub insert_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&self, duration: Duration) {
        self.elements_inserted.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a lookup; `found` includes false positives
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            elements_inserted: self.elements_inserted.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            avg_insert_ns: average(&self.insert_time_ns, &self.elements_inserted),
            avg_lookup_ns: average(&self.lookup_time_ns, &self.lookups_performed),
        }
    }

    /// Ratio of positive lookups to all lookups
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.elements_inserted.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.store_errors.store(0, Ordering::Relaxed);
        self.insert_time_ns.store(0, Ordering::Relaxed);
        self.lookup_time_ns.store(0, Ordering::Relaxed);
    }
}

fn average(total: &AtomicU64, count: &AtomicU64) -> u64 {
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total.load(Ordering::Relaxed) / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub elements_inserted: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub store_errors: u64,
    pub avg_insert_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward to Prometheus, StatsD or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_insert(&self, duration: Duration);

    fn record_lookup(&self, duration: Duration, found: bool);

    fn record_store_error(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_insert(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_store_error(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_insert(&self, duration: Duration) {
        Metrics::record_insert(self, duration);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }

    fn record_store_error(&self) {
        Metrics::record_store_error(self);
    }
}
