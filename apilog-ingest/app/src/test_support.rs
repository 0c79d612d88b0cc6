//! Shared test support utilities
//!
//! Provides `FailingRepository`, a wrapper that delegates to any repository
//! and can be switched into failing mode, for use in unit and integration
//! tests.

use crate::domain::{ApiLog, ApiLogBody, ApiLogHeaders, DomainError, Project, User};
use crate::port::{
    ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository, ProjectRepository,
    RepoFuture, UserRepository,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Repository wrapper with fault injection.
///
/// While `should_fail` is set, every call returns a storage error without
/// touching the wrapped repository. A configured delay is slept before each
/// call, failing or not. Calls are counted either way.
pub struct FailingRepository<R> {
    inner: R,
    should_fail: AtomicBool,
    delay_ms: AtomicU64,
    calls: AtomicUsize,
}

impl<R> FailingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            should_fail: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn guard<'a, T: Send + 'a>(&'a self, call: RepoFuture<'a, T>) -> RepoFuture<'a, T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.should_fail.load(Ordering::SeqCst);
        let delay = Duration::from_millis(self.delay_ms.load(Ordering::SeqCst));
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                return Err(DomainError::storage("injected failure"));
            }
            call.await
        })
    }
}

impl<R: ApiLogRepository> ApiLogRepository for FailingRepository<R> {
    fn create(&self, log: ApiLog) -> RepoFuture<'_, ()> {
        self.guard(self.inner.create(log))
    }

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<ApiLog>> {
        self.guard(self.inner.find_by_id(id))
    }
}

impl<R: ApiLogHeadersRepository> ApiLogHeadersRepository for FailingRepository<R> {
    fn create(&self, headers: ApiLogHeaders) -> RepoFuture<'_, ()> {
        self.guard(self.inner.create(headers))
    }

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogHeaders>> {
        self.guard(self.inner.find_by_log_id(log_id))
    }
}

impl<R: ApiLogBodyRepository> ApiLogBodyRepository for FailingRepository<R> {
    fn create(&self, body: ApiLogBody) -> RepoFuture<'_, ()> {
        self.guard(self.inner.create(body))
    }

    fn find_by_log_id(&self, log_id: Uuid) -> RepoFuture<'_, Option<ApiLogBody>> {
        self.guard(self.inner.find_by_log_id(log_id))
    }
}

impl<R: UserRepository> UserRepository for FailingRepository<R> {
    fn find_by_identifier<'a>(
        &'a self,
        project_id: Uuid,
        identifier: &'a str,
    ) -> RepoFuture<'a, Option<User>> {
        self.guard(self.inner.find_by_identifier(project_id, identifier))
    }

    fn create(&self, user: User) -> RepoFuture<'_, ()> {
        self.guard(self.inner.create(user))
    }
}

impl<R: ProjectRepository> ProjectRepository for FailingRepository<R> {
    fn find_by_api_key<'a>(&'a self, api_key: &'a str) -> RepoFuture<'a, Option<Project>> {
        self.guard(self.inner.find_by_api_key(api_key))
    }

    fn create(&self, project: Project) -> RepoFuture<'_, ()> {
        self.guard(self.inner.create(project))
    }
}
