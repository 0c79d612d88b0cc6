use crate::domain::{DomainError, Project};
use crate::port::{ProjectRepository, RepoFuture};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Projects keyed by API key.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    by_key: RwLock<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectRepository for InMemoryProjectRepository {
    fn find_by_api_key<'a>(&'a self, api_key: &'a str) -> RepoFuture<'a, Option<Project>> {
        Box::pin(async move { Ok(self.by_key.read().await.get(api_key).cloned()) })
    }

    fn create(&self, project: Project) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            let mut projects = self.by_key.write().await;
            if projects.contains_key(&project.api_key) {
                return Err(DomainError::DuplicateApiKey);
            }
            projects.insert(project.api_key.clone(), project);
            Ok(())
        })
    }
}
