use crate::domain::LogEntry;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO buffer of pending entries shared by `Exporter::log` and the flush
/// worker. Every operation holds the lock for its whole duration, so a drain
/// is atomic with respect to concurrent pushes.
#[derive(Debug, Default)]
pub struct EntryQueue {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl EntryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Appends an entry and returns the queue length after the push.
    pub fn push(&self, entry: LogEntry) -> usize {
        let mut entries = self.entries.lock();
        entries.push_back(entry);
        entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes up to `max` entries from the front, oldest first.
    pub fn take_front(&self, max: usize) -> Vec<LogEntry> {
        let mut entries = self.entries.lock();
        let count = max.min(entries.len());
        entries.drain(..count).collect()
    }

    /// Swaps the whole queue out for an empty one.
    pub fn take_all(&self) -> Vec<LogEntry> {
        let drained = std::mem::take(&mut *self.entries.lock());
        drained.into()
    }
}
