use super::RepoFuture;
use crate::domain::User;
use uuid::Uuid;

/// Store of users. Identifiers are unique within a project; `create` fails
/// with [`crate::domain::DomainError::DuplicateUserIdentifier`] otherwise.
pub trait UserRepository: Send + Sync {
    fn find_by_identifier<'a>(
        &'a self,
        project_id: Uuid,
        identifier: &'a str,
    ) -> RepoFuture<'a, Option<User>>;

    fn create(&self, user: User) -> RepoFuture<'_, ()>;
}
