#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod port;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::{AppState, Repositories, api_router};
pub use config::Settings;
pub use domain::{BatchOutcome, DomainError, Environment, TenantContext};
pub use error::IngestError;
