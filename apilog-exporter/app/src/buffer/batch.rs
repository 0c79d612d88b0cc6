use crate::domain::LogEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// What caused a batch to be cut from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchTrigger {
    /// The queue reached `batch_size`.
    Size,
    /// The periodic flush timer fired.
    Timer,
    /// `Exporter::flush` was called.
    Manual,
    /// Final flush during `Exporter::shutdown`.
    Shutdown,
}

impl fmt::Display for BatchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchTrigger::Size => "size",
            BatchTrigger::Timer => "timer",
            BatchTrigger::Manual => "manual",
            BatchTrigger::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Entries captured by one flush. Retries resend this same value, so the
/// entry set and order never change between attempts.
#[derive(Debug, Clone)]
pub struct Batch {
    id: String,
    entries: Vec<LogEntry>,
    create_users: bool,
    trigger: BatchTrigger,
    created_at: Instant,
}

impl Batch {
    pub fn new(entries: Vec<LogEntry>, create_users: bool, trigger: BatchTrigger) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entries,
            create_users,
            trigger,
            created_at: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn create_users(&self) -> bool {
        self.create_users
    }

    pub fn trigger(&self) -> BatchTrigger {
        self.trigger
    }

    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}
