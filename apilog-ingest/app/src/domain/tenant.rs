use super::Environment;
use uuid::Uuid;

/// Project and environment resolved by the auth gate, shared by every entry
/// of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub project_id: Uuid,
    pub environment: Environment,
}
