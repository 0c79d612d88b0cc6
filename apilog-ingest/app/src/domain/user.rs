use super::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// End user of a tenant's API, unique per (project, identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub project_id: Uuid,
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A missing or blank name falls back to the identifier.
    pub fn new(
        project_id: Uuid,
        identifier: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, DomainError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(DomainError::invalid_input("user identifier is required"));
        }
        let name = name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| identifier.clone());

        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            identifier,
            name,
            metadata: Map::new(),
            created_at: Utc::now(),
        })
    }
}
