//! Ingestion counters.
//!
//! All operations use `Ordering::Relaxed`; these are observability counters,
//! not synchronization. Snapshot reads may tear slightly across fields,
//! which is acceptable for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct IngestMetrics {
    pub lines_read: AtomicU64,
    pub records_produced: AtomicU64,
    pub lines_malformed: AtomicU64,
    pub bytes_read: AtomicU64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self, bytes: usize) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_ok(&self) {
        self.records_produced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.lines_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            records_produced: self.records_produced.load(Ordering::Relaxed),
            lines_malformed: self.lines_malformed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub records_produced: u64,
    pub lines_malformed: u64,
    pub bytes_read: u64,
}
