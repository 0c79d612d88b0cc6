use super::RequestMeta;
use crate::domain::ApiLogDraft;
use crate::service::LogSubmission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One log entry on the wire. Required fields are optional here so that a
/// missing one fails only its entry inside a batch. Unknown fields, such as
/// the client's `timestamp`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEntryRequest {
    pub method: Option<String>,
    pub path: Option<String>,
    pub status_code: Option<i64>,
    #[serde(default)]
    pub response_time_ms: u64,
    #[serde(default)]
    pub content_length: u64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub error_message: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_identifier: Option<String>,
    pub request_headers: Option<Map<String, Value>>,
    pub response_headers: Option<Map<String, Value>>,
    pub request_body: Option<Value>,
    pub response_body: Option<Value>,
}

impl LogEntryRequest {
    /// Client address and user agent fall back to the ingestion request's
    /// own when the entry leaves them empty.
    pub fn into_submission(self, meta: &RequestMeta) -> LogSubmission {
        LogSubmission {
            draft: ApiLogDraft {
                method: self.method,
                path: self.path,
                status_code: self.status_code,
                response_time_ms: self.response_time_ms,
                content_length: self.content_length,
                ip_address: non_empty(self.ip_address).unwrap_or_else(|| meta.ip_address.clone()),
                user_agent: non_empty(self.user_agent).unwrap_or_else(|| meta.user_agent.clone()),
                error_message: self.error_message,
                user_id: self.user_id,
            },
            user_identifier: self.user_identifier,
            user_name: self.user_name,
            request_headers: self.request_headers,
            response_headers: self.response_headers,
            request_body: self.request_body,
            response_body: self.response_body,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchLogRequest {
    pub logs: Vec<LogEntryRequest>,
    #[serde(default)]
    pub create_users: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleLogRequest {
    #[serde(flatten)]
    pub entry: LogEntryRequest,
    #[serde(default)]
    pub create_users: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}
