use super::Deadline;
use crate::domain::{DomainError, Environment, TenantContext};
use crate::port::ProjectRepository;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves an API key and environment tag to the owning project.
#[derive(Clone)]
pub struct ProjectAuthenticator {
    projects: Arc<dyn ProjectRepository>,
}

impl ProjectAuthenticator {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Unknown keys and lookup failures yield [`DomainError::InvalidApiKey`];
    /// inactive projects and environment mismatches yield
    /// [`DomainError::Unauthorized`].
    pub async fn authenticate(
        &self,
        api_key: &str,
        environment: Environment,
        deadline: Deadline,
    ) -> Result<TenantContext, DomainError> {
        if api_key.is_empty() {
            return Err(DomainError::InvalidApiKey);
        }

        let project = match deadline.run(self.projects.find_by_api_key(api_key)).await {
            Ok(Some(project)) => project,
            Ok(None) => return Err(DomainError::InvalidApiKey),
            Err(e) => {
                warn!(error = %e, "Project lookup failed");
                return Err(DomainError::InvalidApiKey);
            }
        };

        if !project.is_active {
            debug!(project_id = %project.id, "Rejected key of inactive project");
            return Err(DomainError::Unauthorized);
        }

        if project.environment != environment {
            debug!(
                project_id = %project.id,
                expected = %project.environment,
                supplied = %environment,
                "Rejected key for wrong environment"
            );
            return Err(DomainError::Unauthorized);
        }

        Ok(TenantContext {
            project_id: project.id,
            environment: project.environment,
        })
    }
}
