//! Client statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters updated by every exchange.
#[derive(Debug)]
pub struct ClientStats {
    /// Requests handed to the client
    pub requests_total: AtomicU64,
    /// Requests that produced a response, whatever its status
    pub requests_completed: AtomicU64,
    /// Requests that ended in a transport error
    pub requests_failed: AtomicU64,
    /// Requests aborted by a filter before dialing
    pub requests_filtered: AtomicU64,
    /// Request body bytes written
    pub bytes_sent: AtomicU64,
    /// Response body bytes read
    pub bytes_received: AtomicU64,
    /// Connection attempts
    pub connections_total: AtomicU64,
    /// Connection attempts that failed, TLS included
    pub connections_failed: AtomicU64,
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
            requests_completed: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            requests_filtered: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            connections_failed: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self, sent: u64, received: u64) {
        self.requests_completed.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(sent, Ordering::Relaxed);
        self.bytes_received.fetch_add(received, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.requests_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection_failure(&self) {
        self.connections_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of requests that produced a response.
    pub fn completion_ratio(&self) -> f64 {
        let total = self.requests_total.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            let completed = self.requests_completed.load(Ordering::Relaxed);
            #[allow(clippy::cast_precision_loss)]
            {
                completed as f64 / total as f64
            }
        }
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Create a snapshot of current statistics
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_completed: self.requests_completed.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            requests_filtered: self.requests_filtered.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_failed: self.connections_failed.load(Ordering::Relaxed),
            completion_ratio: self.completion_ratio(),
            age: self.age(),
        }
    }
}

/// Snapshot of client statistics at a point in time
#[derive(Debug, Clone)]
pub struct ClientStatsSnapshot {
    pub requests_total: u64,
    pub requests_completed: u64,
    pub requests_failed: u64,
    pub requests_filtered: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub connections_total: u64,
    pub connections_failed: u64,
    pub completion_ratio: f64,
    pub age: Duration,
}
