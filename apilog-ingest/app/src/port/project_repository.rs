use super::RepoFuture;
use crate::domain::Project;

pub trait ProjectRepository: Send + Sync {
    fn find_by_api_key<'a>(&'a self, api_key: &'a str) -> RepoFuture<'a, Option<Project>>;

    /// Fails with [`crate::domain::DomainError::DuplicateApiKey`] when the key
    /// is already bound to another project.
    fn create(&self, project: Project) -> RepoFuture<'_, ()>;
}
