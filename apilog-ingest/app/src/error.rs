use crate::domain::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to seed bootstrap project: {0}")]
    Seed(#[source] DomainError),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
