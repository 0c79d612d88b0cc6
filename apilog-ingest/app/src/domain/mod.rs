pub mod api_log;
pub mod environment;
pub mod error;
pub mod outcome;
pub mod project;
pub mod tenant;
pub mod user;

pub use api_log::{
    ApiLog, ApiLogBody, ApiLogDraft, ApiLogHeaders, HttpMethod, is_empty_body,
    validate_status_code,
};
pub use environment::Environment;
pub use error::DomainError;
pub use outcome::{BatchOutcome, BatchStatus};
pub use project::Project;
pub use tenant::TenantContext;
pub use user::User;
