use super::LogEntry;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/logs/batch`.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub logs: &'a [LogEntry],
    pub create_users: bool,
}

/// Per-batch tally returned by the ingestion server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BatchOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// `{"data": ...}` wrapper used by every successful server response.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// `{"error": ...}` wrapper used by server error responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: String,
}
