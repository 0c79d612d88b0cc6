use super::{DomainError, Environment, TenantContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const MIN_STATUS_CODE: i64 = 100;
pub const MAX_STATUS_CODE: i64 = 599;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the canonical upper-case verbs are accepted on ingestion.
impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(DomainError::invalid_input(format!(
                "unsupported method: {other}"
            ))),
        }
    }
}

/// Core record of one observed API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLog {
    pub id: Uuid,
    pub project_id: Uuid,
    pub environment: Environment,
    pub method: HttpMethod,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub content_length: u64,
    pub ip_address: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Unvalidated fields of a log record as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiLogDraft {
    pub method: Option<String>,
    pub path: Option<String>,
    pub status_code: Option<i64>,
    pub response_time_ms: u64,
    pub content_length: u64,
    pub ip_address: String,
    pub user_agent: String,
    pub error_message: Option<String>,
    pub user_id: Option<String>,
}

impl ApiLogDraft {
    /// Validates the draft and turns it into a record owned by `tenant`,
    /// stamped with a fresh id and the receipt time.
    pub fn validate(self, tenant: &TenantContext) -> Result<ApiLog, DomainError> {
        if tenant.project_id.is_nil() {
            return Err(DomainError::invalid_input("project id is required"));
        }

        let method = match self.method.as_deref() {
            None | Some("") => return Err(DomainError::invalid_input("method is required")),
            Some(raw) => raw.parse::<HttpMethod>()?,
        };

        let path = match self.path {
            Some(path) if !path.is_empty() => path,
            _ => return Err(DomainError::invalid_input("path is required")),
        };

        let status_code = match self.status_code {
            None => return Err(DomainError::invalid_input("status code is required")),
            Some(code) => validate_status_code(code)?,
        };

        Ok(ApiLog {
            id: Uuid::new_v4(),
            project_id: tenant.project_id,
            environment: tenant.environment,
            method,
            path,
            status_code,
            response_time_ms: self.response_time_ms,
            content_length: self.content_length,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            error_message: self.error_message.filter(|message| !message.is_empty()),
            user_id: self.user_id.filter(|id| !id.is_empty()),
            timestamp: Utc::now(),
        })
    }
}

pub fn validate_status_code(code: i64) -> Result<u16, DomainError> {
    if !(MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&code) {
        return Err(DomainError::invalid_input(format!(
            "status code must be between {MIN_STATUS_CODE} and {MAX_STATUS_CODE}, got {code}"
        )));
    }
    u16::try_from(code).map_err(|_| DomainError::invalid_input("status code out of range"))
}

/// Request/response headers of a log, stored apart from the core record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLogHeaders {
    pub id: Uuid,
    pub log_id: Uuid,
    pub request_headers: Map<String, Value>,
    pub response_headers: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl ApiLogHeaders {
    /// Returns `None` when there is nothing to store.
    pub fn for_log(
        log_id: Uuid,
        request_headers: Option<Map<String, Value>>,
        response_headers: Option<Map<String, Value>>,
    ) -> Option<Self> {
        let request_headers = request_headers.unwrap_or_default();
        let response_headers = response_headers.unwrap_or_default();
        if request_headers.is_empty() && response_headers.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            log_id,
            request_headers,
            response_headers,
            created_at: Utc::now(),
        })
    }
}

/// Request/response bodies of a log, stored apart from the core record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLogBody {
    pub id: Uuid,
    pub log_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl ApiLogBody {
    /// Returns `None` when both bodies are empty. Empty halves are dropped.
    pub fn for_log(
        log_id: Uuid,
        request_body: Option<Value>,
        response_body: Option<Value>,
    ) -> Option<Self> {
        let request_body = request_body.filter(|body| !is_empty_body(body));
        let response_body = response_body.filter(|body| !is_empty_body(body));
        if request_body.is_none() && response_body.is_none() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            log_id,
            request_body,
            response_body,
            created_at: Utc::now(),
        })
    }
}

/// `null`, `""`, `[]` and `{}` carry nothing worth storing.
pub fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
