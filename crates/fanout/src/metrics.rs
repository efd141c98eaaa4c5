//! Fanout metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatch counters for a single fanout sink
#[derive(Debug, Default)]
pub struct FanoutMetrics {
    /// Writes delivered to every destination
    write_count: AtomicU64,
    /// Bytes accepted by the sink (counted once per successful write)
    bytes_written: AtomicU64,
    /// Writes stopped by a destination error
    failure_count: AtomicU64,
    /// Writes stopped by a short write
    short_write_count: AtomicU64,
}

impl FanoutMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total write count
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Record a fully delivered write of `len` bytes
    pub fn record_write(&self, len: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(len as u64, Ordering::Relaxed);
    }

    /// Get total bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get short write count
    pub fn short_write_count(&self) -> u64 {
        self.short_write_count.load(Ordering::Relaxed)
    }

    /// Increment short write count
    pub fn inc_short_write_count(&self) {
        self.short_write_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count(),
            bytes_written: self.bytes_written(),
            failure_count: self.failure_count(),
            short_write_count: self.short_write_count(),
        }
    }
}

/// Snapshot of fanout metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub bytes_written: u64,
    pub failure_count: u64,
    pub short_write_count: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "writes={}, bytes={}, failures={}, short_writes={}",
            self.write_count, self.bytes_written, self.failure_count, self.short_write_count
        )
    }
}
