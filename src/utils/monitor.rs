use std::sync::atomic::{AtomicI64, Ordering};

/// A single process-wide counter. Every mutation is one atomic operation.
#[derive(Debug, Default)]
pub struct Counter(AtomicI64);

impl Counter {
    pub fn increment_and_get(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn decrement_and_get(&self) -> i64 {
        self.0.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// (in-flight, total, failed) as observed by one hook.
///
/// The three values come from three independent reads, so a snapshot taken
/// while other requests are running may be torn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub in_flight: i64,
    pub total: i64,
    pub failed: i64,
}

/// 請求計數器：只由非阻塞路徑更新
#[derive(Debug, Default)]
pub struct RequestMetrics {
    processed: Counter,
    concurrent: Counter,
    failed: Counter,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed(&self) -> &Counter {
        &self.processed
    }

    pub fn concurrent(&self) -> &Counter {
        &self.concurrent
    }

    pub fn failed(&self) -> &Counter {
        &self.failed
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            in_flight: self.concurrent.get(),
            total: self.processed.get(),
            failed: self.failed.get(),
        }
    }

    /// Fired when a non-blocking request is first polled.
    pub fn log_start_request(&self) -> MetricsSnapshot {
        let snapshot = MetricsSnapshot {
            in_flight: self.concurrent.increment_and_get(),
            total: self.processed.get(),
            failed: self.failed.get(),
        };
        tracing::debug!(
            "composite-async START ({}/{}/{})",
            snapshot.in_flight,
            snapshot.total,
            snapshot.failed
        );
        snapshot
    }

    pub fn log_end_request(&self) -> MetricsSnapshot {
        let snapshot = self.end_request();
        tracing::debug!(
            "composite-async DONE  ({}/{}/{})",
            snapshot.in_flight,
            snapshot.total,
            snapshot.failed
        );
        snapshot
    }

    /// The failed counter is only read here, never incremented.
    pub fn log_end_request_with_error(&self, error: &dyn std::fmt::Display) -> MetricsSnapshot {
        let snapshot = self.end_request();
        tracing::warn!(
            "composite-async ERROR: {} ({}/{}/{})",
            error,
            snapshot.in_flight,
            snapshot.total,
            snapshot.failed
        );
        snapshot
    }

    fn end_request(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            in_flight: self.concurrent.decrement_and_get(),
            total: self.processed.increment_and_get(),
            failed: self.failed.get(),
        }
    }
}
