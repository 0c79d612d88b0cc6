use thiserror::Error;

/// Failures of a single domain operation (validation, lookup, persistence).
///
/// Per-entry failures in a batch are reported to the client through their
/// `Display` text, so messages stay short and stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid environment")]
    InvalidEnvironment,

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("unauthorized")]
    Unauthorized,

    #[error("user identifier already exists in project")]
    DuplicateUserIdentifier,

    #[error("API key already in use")]
    DuplicateApiKey,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        DomainError::Storage(message.into())
    }
}
