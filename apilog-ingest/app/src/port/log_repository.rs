use super::RepoFuture;
use crate::domain::{ApiLog, ApiLogBody, ApiLogHeaders};
use uuid::Uuid;

/// Store of core log records.
pub trait ApiLogRepository: Send + Sync {
    fn create(&self, log: ApiLog) -> RepoFuture<'_, ()>;

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<ApiLog>>;
}

/// Store of header side-records, keyed by log id.
pub trait ApiLogHeadersRepository: Send + Sync {
    fn create(&self, headers: ApiLogHeaders) -> RepoFuture<'_, ()>;

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogHeaders>>;
}

/// Store of body side-records, keyed by log id.
pub trait ApiLogBodyRepository: Send + Sync {
    fn create(&self, body: ApiLogBody) -> RepoFuture<'_, ()>;

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogBody>>;
}
