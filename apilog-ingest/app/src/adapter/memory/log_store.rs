use crate::domain::{ApiLog, ApiLogBody, ApiLogHeaders};
use crate::port::{ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository, RepoFuture};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryApiLogRepository {
    logs: RwLock<HashMap<Uuid, ApiLog>>,
}

impl InMemoryApiLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.logs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.logs.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<ApiLog> {
        self.logs.read().await.values().cloned().collect()
    }
}

impl ApiLogRepository for InMemoryApiLogRepository {
    fn create(&self, log: ApiLog) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            self.logs.write().await.insert(log.id, log);
            Ok(())
        })
    }

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<ApiLog>> {
        Box::pin(async move { Ok(self.logs.read().await.get(&id).cloned()) })
    }
}

/// Header records indexed by the log they belong to.
#[derive(Debug, Default)]
pub struct InMemoryHeadersRepository {
    by_log: RwLock<HashMap<Uuid, ApiLogHeaders>>,
}

impl InMemoryHeadersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.by_log.read().await.len()
    }
}

impl ApiLogHeadersRepository for InMemoryHeadersRepository {
    fn create(&self, headers: ApiLogHeaders) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            self.by_log.write().await.insert(headers.log_id, headers);
            Ok(())
        })
    }

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogHeaders>> {
        Box::pin(async move { Ok(self.by_log.read().await.get(&log_id).cloned()) })
    }
}

/// Body records indexed by the log they belong to.
#[derive(Debug, Default)]
pub struct InMemoryBodyRepository {
    by_log: RwLock<HashMap<Uuid, ApiLogBody>>,
}

impl InMemoryBodyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.by_log.read().await.len()
    }
}

impl ApiLogBodyRepository for InMemoryBodyRepository {
    fn create(&self, body: ApiLogBody) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            self.by_log.write().await.insert(body.log_id, body);
            Ok(())
        })
    }

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogBody>> {
        Box::pin(async move { Ok(self.by_log.read().await.get(&log_id).cloned()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiLogDraft, Environment, TenantContext};
    use serde_json::json;

    fn log() -> ApiLog {
        let tenant = TenantContext {
            project_id: Uuid::new_v4(),
            environment: Environment::Dev,
        };
        ApiLogDraft {
            method: Some("POST".into()),
            path: Some("/orders".into()),
            status_code: Some(201),
            ..ApiLogDraft::default()
        }
        .validate(&tenant)
        .unwrap()
    }

    #[tokio::test]
    async fn stores_and_finds_logs() {
        let repo = InMemoryApiLogRepository::new();
        let log = log();
        let id = log.id;

        repo.create(log.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(id).await.unwrap(), Some(log));
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn side_records_are_keyed_by_log() {
        let log_id = Uuid::new_v4();
        let bodies = InMemoryBodyRepository::new();
        let body = ApiLogBody::for_log(log_id, Some(json!({"a": 1})), None).unwrap();

        bodies.create(body.clone()).await.unwrap();

        assert_eq!(bodies.find_by_log_id(log_id).await.unwrap(), Some(body));
        assert_eq!(bodies.find_by_log_id(Uuid::new_v4()).await.unwrap(), None);
    }
}
