pub mod log_repository;
pub mod project_repository;
pub mod user_repository;

use crate::domain::DomainError;
use std::future::Future;
use std::pin::Pin;

pub use log_repository::{ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository};
pub use project_repository::ProjectRepository;
pub use user_repository::UserRepository;

/// Boxed future returned by every repository method, keeping the traits
/// dyn-compatible.
pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DomainError>> + Send + 'a>>;
