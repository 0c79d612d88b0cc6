pub mod auth;
pub mod error;
pub mod logs;
pub mod meta;
pub mod payload;

pub use auth::require_api_key;
pub use error::ApiError;
pub use logs::{create_batch_logs, create_log};
pub use meta::{RequestMeta, stamp_deadline};
