use super::{Deadline, UserResolver};
use crate::domain::{
    ApiLog, ApiLogBody, ApiLogDraft, ApiLogHeaders, DomainError, TenantContext,
};
use crate::port::{ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use uuid::Uuid;

/// One log entry as received, before user resolution and validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSubmission {
    pub draft: ApiLogDraft,
    pub user_identifier: Option<String>,
    pub user_name: Option<String>,
    pub request_headers: Option<Map<String, Value>>,
    pub response_headers: Option<Map<String, Value>>,
    pub request_body: Option<Value>,
    pub response_body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideRecordKind {
    Headers,
    Body,
}

impl fmt::Display for SideRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideRecordKind::Headers => f.write_str("headers"),
            SideRecordKind::Body => f.write_str("body"),
        }
    }
}

/// A headers or body record that could not be stored. The core log it
/// belongs to was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SideRecordFailure {
    pub log_id: Uuid,
    pub kind: SideRecordKind,
    pub error: DomainError,
}

/// Observer of side-record failures.
pub type SideRecordHook = Arc<dyn Fn(&SideRecordFailure) + Send + Sync>;

fn warn_side_record_failure(failure: &SideRecordFailure) {
    warn!(
        log_id = %failure.log_id,
        kind = %failure.kind,
        error = %failure.error,
        "Failed to store side record, keeping core log"
    );
}

/// Stores one log entry across the core, headers and body facets.
pub struct ApiLogService {
    logs: Arc<dyn ApiLogRepository>,
    headers: Arc<dyn ApiLogHeadersRepository>,
    bodies: Arc<dyn ApiLogBodyRepository>,
    users: UserResolver,
    side_record_hook: SideRecordHook,
    side_record_failures: AtomicU64,
}

impl ApiLogService {
    pub fn new(
        logs: Arc<dyn ApiLogRepository>,
        headers: Arc<dyn ApiLogHeadersRepository>,
        bodies: Arc<dyn ApiLogBodyRepository>,
        users: UserResolver,
    ) -> Self {
        Self {
            logs,
            headers,
            bodies,
            users,
            side_record_hook: Arc::new(warn_side_record_failure),
            side_record_failures: AtomicU64::new(0),
        }
    }

    /// Replaces the default hook, which emits a `warn!` event.
    pub fn with_side_record_hook(mut self, hook: SideRecordHook) -> Self {
        self.side_record_hook = hook;
        self
    }

    pub fn side_record_failures(&self) -> u64 {
        self.side_record_failures.load(Ordering::Relaxed)
    }

    /// Resolves the user, validates and stores the core record, then the
    /// side-records. Only a validation or core write failure is an error.
    pub async fn create_log(
        &self,
        tenant: &TenantContext,
        submission: LogSubmission,
        create_users: bool,
        deadline: Deadline,
    ) -> Result<ApiLog, DomainError> {
        let LogSubmission {
            mut draft,
            user_identifier,
            user_name,
            request_headers,
            response_headers,
            request_body,
            response_body,
        } = submission;

        let direct_user = draft.user_id.as_deref().is_some_and(|id| !id.is_empty());
        let identifier = user_identifier
            .as_deref()
            .filter(|id| create_users && !direct_user && !id.is_empty());
        if let Some(identifier) = identifier {
            draft.user_id = self
                .users
                .resolve(tenant.project_id, identifier, user_name.as_deref(), deadline)
                .await
                .map(|id| id.to_string());
        }

        let log = draft.validate(tenant)?;
        let headers = ApiLogHeaders::for_log(log.id, request_headers, response_headers);
        let body = ApiLogBody::for_log(log.id, request_body, response_body);

        deadline.run(self.logs.create(log.clone())).await?;

        if let Some(headers) = headers {
            if let Err(error) = deadline.run(self.headers.create(headers)).await {
                self.report(log.id, SideRecordKind::Headers, error);
            }
        }
        if let Some(body) = body {
            if let Err(error) = deadline.run(self.bodies.create(body)).await {
                self.report(log.id, SideRecordKind::Body, error);
            }
        }

        Ok(log)
    }

    fn report(&self, log_id: Uuid, kind: SideRecordKind, error: DomainError) {
        self.side_record_failures.fetch_add(1, Ordering::Relaxed);
        (self.side_record_hook)(&SideRecordFailure {
            log_id,
            kind,
            error,
        });
    }
}
