//! Per-instance request counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::{Error, Kind};

/// Request outcome counters for one client instance
#[derive(Debug)]
pub struct ClientStats {
    /// Total number of requests started
    pub requests_total: AtomicU64,
    /// Requests that resolved with an envelope
    pub requests_successful: AtomicU64,
    /// Requests rejected with any error kind
    pub requests_failed: AtomicU64,
    /// Rejections of kind `Cancel`
    pub requests_cancelled: AtomicU64,
    /// Rejections of kind `Timeout`
    pub requests_timed_out: AtomicU64,
    /// Client creation time
    pub created_at: Instant,
}

impl Default for ClientStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_successful: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            requests_cancelled: AtomicU64::new(0),
            requests_timed_out: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.requests_successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &Error) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        match error.kind() {
            Kind::Cancel => {
                self.requests_cancelled.fetch_add(1, Ordering::Relaxed);
            }
            Kind::Timeout => {
                self.requests_timed_out.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Get success ratio
    pub fn success_ratio(&self) -> f64 {
        let total = self.requests_total.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            let successful = self.requests_successful.load(Ordering::Relaxed);
            // Precision loss acceptable for success rate statistics
            #[allow(clippy::cast_precision_loss)]
            {
                successful as f64 / total as f64
            }
        }
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_successful: self.requests_successful.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            requests_cancelled: self.requests_cancelled.load(Ordering::Relaxed),
            requests_timed_out: self.requests_timed_out.load(Ordering::Relaxed),
            success_ratio: self.success_ratio(),
            age: self.age(),
        }
    }
}

/// Snapshot of client statistics at a point in time
#[derive(Debug, Clone)]
pub struct ClientStatsSnapshot {
    pub requests_total: u64,
    pub requests_successful: u64,
    pub requests_failed: u64,
    pub requests_cancelled: u64,
    pub requests_timed_out: u64,
    pub success_ratio: f64,
    pub age: Duration,
}
