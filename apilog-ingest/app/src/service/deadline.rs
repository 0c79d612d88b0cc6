use crate::domain::DomainError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Point in time after which a request issues no more store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    pub fn has_passed(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Runs one store call within the deadline. A call is never started once
    /// the deadline has passed, even if it would complete immediately.
    pub async fn run<T, F>(self, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        if self.has_passed() {
            return Err(DomainError::DeadlineExceeded);
        }
        tokio::time::timeout_at(self.0, call)
            .await
            .unwrap_or(Err(DomainError::DeadlineExceeded))
    }
}
