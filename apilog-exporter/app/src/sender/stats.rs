// Exporter counters kept with relaxed atomics; readers only ever need a
// point-in-time snapshot.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ExporterStats {
    batches_sent: AtomicU64,
    entries_sent: AtomicU64,
    entries_dropped: AtomicU64,
    retries: AtomicU64,
    batches_rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub batches_sent: u64,
    pub entries_sent: u64,
    pub entries_dropped: u64,
    pub retries: u64,
    pub batches_rejected: u64,
}

impl ExporterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&self, entries: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.entries_sent.fetch_add(entries as u64, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, entries: usize) {
        self.entries_dropped
            .fetch_add(entries as u64, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.batches_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            entries_sent: self.entries_sent.load(Ordering::Relaxed),
            entries_dropped: self.entries_dropped.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            batches_rejected: self.batches_rejected.load(Ordering::Relaxed),
        }
    }
}
