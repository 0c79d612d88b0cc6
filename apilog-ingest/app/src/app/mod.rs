mod router;
pub mod server;
mod state;
pub mod tracing;

pub use router::api_router;
pub use state::{AppState, Repositories};

use crate::config::{self, Settings};
use crate::domain::Project;
use crate::error::IngestError;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), IngestError> {
    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        host = %settings.host,
        port = settings.http_port,
        request_timeout_ms = settings.request_timeout_ms,
        "Loaded settings"
    );

    let repositories = Repositories::in_memory();
    seed_project(&settings, &repositories).await?;

    let state = AppState::new(&repositories, settings.request_timeout());
    let app = api_router(state);

    server::serve(app, &settings.bind_address(), CancellationToken::new()).await
}

/// Registers the project named in settings so its key can authenticate.
pub async fn seed_project(
    settings: &Settings,
    repositories: &Repositories,
) -> Result<Option<Project>, IngestError> {
    let Some(api_key) = settings.bootstrap_api_key.as_deref() else {
        ::tracing::warn!("APP_API_KEY is not set; every ingestion request will be rejected");
        return Ok(None);
    };

    let project = Project::new(
        settings.project_name.as_str(),
        api_key,
        settings.project_environment,
    );
    repositories
        .projects
        .create(project.clone())
        .await
        .map_err(IngestError::Seed)?;

    ::tracing::info!(
        project_id = %project.id,
        name = %project.name,
        environment = %project.environment,
        "Seeded bootstrap project"
    );
    Ok(Some(project))
}
