use super::DomainError;
use serde::{Deserialize, Serialize};

/// Per-request tally of a batch ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// How a batch went as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every entry was stored.
    Complete,
    /// Some entries were stored, some failed.
    Partial,
    /// No entry was stored.
    Failed,
}

impl BatchOutcome {
    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, error: &DomainError) {
        self.failed_count += 1;
        self.errors.push(error.to_string());
    }

    pub fn status(&self) -> BatchStatus {
        if self.failed_count == 0 {
            BatchStatus::Complete
        } else if self.success_count == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }
}
