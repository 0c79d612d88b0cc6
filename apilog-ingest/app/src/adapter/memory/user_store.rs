use crate::domain::{DomainError, User};
use crate::port::{RepoFuture, UserRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users keyed by (project, identifier). The write lock makes the
/// uniqueness check and the insert one step.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<(Uuid, String), User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_identifier<'a>(
        &'a self,
        project_id: Uuid,
        identifier: &'a str,
    ) -> RepoFuture<'a, Option<User>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users.get(&(project_id, identifier.to_string())).cloned())
        })
    }

    fn create(&self, user: User) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            let mut users = self.users.write().await;
            let key = (user.project_id, user.identifier.clone());
            if users.contains_key(&key) {
                return Err(DomainError::DuplicateUserIdentifier);
            }
            users.insert(key, user);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identifiers_are_unique_per_project() {
        let repo = InMemoryUserRepository::new();
        let project_a = Uuid::new_v4();
        let project_b = Uuid::new_v4();

        repo.create(User::new(project_a, "alice", None).unwrap())
            .await
            .unwrap();
        repo.create(User::new(project_b, "alice", None).unwrap())
            .await
            .unwrap();

        let duplicate = repo
            .create(User::new(project_a, "alice", Some("Alice".into())).unwrap())
            .await;
        assert_eq!(duplicate, Err(DomainError::DuplicateUserIdentifier));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn lookup_is_scoped_by_project() {
        let repo = InMemoryUserRepository::new();
        let project = Uuid::new_v4();
        let user = User::new(project, "bob", None).unwrap();
        repo.create(user.clone()).await.unwrap();

        assert_eq!(
            repo.find_by_identifier(project, "bob").await.unwrap(),
            Some(user)
        );
        assert_eq!(
            repo.find_by_identifier(Uuid::new_v4(), "bob").await.unwrap(),
            None
        );
    }
}
