//! In-memory repositories.
//!
//! The storage engine is pluggable through the [`crate::port`] traits; these
//! adapters keep everything in process memory so the service runs without
//! one. Nothing survives a restart.

mod log_store;
mod project_store;
mod user_store;

pub use log_store::{InMemoryApiLogRepository, InMemoryBodyRepository, InMemoryHeadersRepository};
pub use project_store::InMemoryProjectRepository;
pub use user_store::InMemoryUserRepository;
