use crate::adapter::memory::{
    InMemoryApiLogRepository, InMemoryBodyRepository, InMemoryHeadersRepository,
    InMemoryProjectRepository, InMemoryUserRepository,
};
use crate::port::{
    ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository, ProjectRepository,
    UserRepository,
};
use crate::service::{ApiLogService, BatchProcessor, ProjectAuthenticator, UserResolver};
use std::sync::Arc;
use std::time::Duration;

/// Storage facets behind the ingestion pipeline.
#[derive(Clone)]
pub struct Repositories {
    pub logs: Arc<dyn ApiLogRepository>,
    pub headers: Arc<dyn ApiLogHeadersRepository>,
    pub bodies: Arc<dyn ApiLogBodyRepository>,
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            logs: Arc::new(InMemoryApiLogRepository::new()),
            headers: Arc::new(InMemoryHeadersRepository::new()),
            bodies: Arc::new(InMemoryBodyRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
        }
    }
}

/// Shared application state of the ingestion routes.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: ProjectAuthenticator,
    pub service: Arc<ApiLogService>,
    pub processor: BatchProcessor,
    pub request_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(repositories: &Repositories, request_timeout: Duration) -> Self {
        let service = ApiLogService::new(
            repositories.logs.clone(),
            repositories.headers.clone(),
            repositories.bodies.clone(),
            UserResolver::new(repositories.users.clone()),
        );
        Self::with_service(repositories, service, request_timeout)
    }

    /// Uses a preconfigured service, e.g. one with a custom side-record hook.
    #[must_use]
    pub fn with_service(
        repositories: &Repositories,
        service: ApiLogService,
        request_timeout: Duration,
    ) -> Self {
        let service = Arc::new(service);
        Self {
            authenticator: ProjectAuthenticator::new(repositories.projects.clone()),
            processor: BatchProcessor::new(service.clone()),
            service,
            request_timeout,
        }
    }
}
