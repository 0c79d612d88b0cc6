#![allow(dead_code)]

use apilog_ingest::adapter::memory::{
    InMemoryApiLogRepository, InMemoryBodyRepository, InMemoryHeadersRepository,
    InMemoryProjectRepository, InMemoryUserRepository,
};
use apilog_ingest::domain::{Environment, Project};
use apilog_ingest::port::ProjectRepository;
use apilog_ingest::test_support::FailingRepository;
use apilog_ingest::{AppState, Repositories, api_router};
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY: &str = "test-key";

/// Concrete handles on every store behind a test server.
pub struct Stores {
    pub logs: Arc<FailingRepository<InMemoryApiLogRepository>>,
    pub headers: Arc<FailingRepository<InMemoryHeadersRepository>>,
    pub bodies: Arc<FailingRepository<InMemoryBodyRepository>>,
    pub users: Arc<FailingRepository<InMemoryUserRepository>>,
    pub projects: Arc<InMemoryProjectRepository>,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(FailingRepository::new(InMemoryApiLogRepository::new())),
            headers: Arc::new(FailingRepository::new(InMemoryHeadersRepository::new())),
            bodies: Arc::new(FailingRepository::new(InMemoryBodyRepository::new())),
            users: Arc::new(FailingRepository::new(InMemoryUserRepository::new())),
            projects: Arc::new(InMemoryProjectRepository::new()),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            logs: self.logs.clone(),
            headers: self.headers.clone(),
            bodies: self.bodies.clone(),
            users: self.users.clone(),
            projects: self.projects.clone(),
        }
    }
}

/// Test server with one active `production` project keyed by [`API_KEY`].
pub async fn setup() -> (TestServer, Stores, Project) {
    setup_with_timeout(Duration::from_secs(5)).await
}

pub async fn setup_with_timeout(timeout: Duration) -> (TestServer, Stores, Project) {
    let stores = Stores::new();
    let project = Project::new("shop", API_KEY, Environment::Production);
    stores.projects.create(project.clone()).await.unwrap();

    let state = AppState::new(&stores.repositories(), timeout);
    let server = TestServer::new(api_router(state)).unwrap();
    (server, stores, project)
}

pub fn authed(request: TestRequest) -> TestRequest {
    request
        .add_header(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static(API_KEY),
        )
        .add_header(
            HeaderName::from_static("x-environment"),
            HeaderValue::from_static("production"),
        )
}
