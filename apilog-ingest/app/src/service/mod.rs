pub mod auth;
pub mod batch_processor;
pub mod deadline;
pub mod log_service;
pub mod user_resolver;

pub use auth::ProjectAuthenticator;
pub use batch_processor::BatchProcessor;
pub use deadline::Deadline;
pub use log_service::{
    ApiLogService, LogSubmission, SideRecordFailure, SideRecordHook, SideRecordKind,
};
pub use user_resolver::UserResolver;
