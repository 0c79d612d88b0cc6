use super::Deadline;
use crate::domain::{DomainError, User};
use crate::port::UserRepository;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Finds or creates the user behind an identifier. Every failure degrades
/// to "no user" so the log entry itself is never lost to identity problems.
#[derive(Clone)]
pub struct UserResolver {
    users: Arc<dyn UserRepository>,
}

impl UserResolver {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn resolve(
        &self,
        project_id: Uuid,
        identifier: &str,
        name: Option<&str>,
        deadline: Deadline,
    ) -> Option<Uuid> {
        match self.lookup(project_id, identifier, deadline).await {
            Ok(Some(user)) => return Some(user.id),
            Ok(None) => {}
            Err(e) => {
                warn!(%project_id, identifier, error = %e, "User lookup failed");
                return None;
            }
        }

        let user = match User::new(project_id, identifier, name.map(str::to_string)) {
            Ok(user) => user,
            Err(e) => {
                warn!(%project_id, identifier, error = %e, "Cannot create user");
                return None;
            }
        };
        let user_id = user.id;

        match deadline.run(self.users.create(user)).await {
            Ok(()) => {
                debug!(%project_id, identifier, %user_id, "Created user");
                Some(user_id)
            }
            Err(DomainError::DuplicateUserIdentifier) => {
                // Another request created it first.
                match self.lookup(project_id, identifier, deadline).await {
                    Ok(found) => found.map(|user| user.id),
                    Err(e) => {
                        warn!(%project_id, identifier, error = %e, "User lookup failed");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(%project_id, identifier, error = %e, "User creation failed");
                None
            }
        }
    }

    async fn lookup(
        &self,
        project_id: Uuid,
        identifier: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, DomainError> {
        deadline
            .run(self.users.find_by_identifier(project_id, identifier))
            .await
    }
}
