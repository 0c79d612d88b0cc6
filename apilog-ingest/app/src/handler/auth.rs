use super::ApiError;
use super::meta::header_str;
use crate::app::AppState;
use crate::domain::Environment;
use crate::service::Deadline;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

const API_KEY_HEADER: &str = "x-api-key";
const ENVIRONMENT_HEADER: &str = "x-environment";

/// Authentication gate of the ingestion routes.
///
/// Resolves `X-API-Key` and `X-Environment` (default `dev`) to a
/// [`crate::domain::TenantContext`] and stores it in the request extensions.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();

    let api_key = header_str(headers, API_KEY_HEADER).unwrap_or_default();
    if api_key.is_empty() {
        return Err(ApiError::unauthorized("API key is required"));
    }

    let environment = match headers.get(ENVIRONMENT_HEADER) {
        None => Environment::default(),
        Some(value) => match value.to_str() {
            Ok("") => Environment::default(),
            Ok(tag) => tag
                .parse::<Environment>()
                .map_err(|_| ApiError::bad_request("Invalid environment"))?,
            Err(_) => return Err(ApiError::bad_request("Invalid environment")),
        },
    };

    let deadline = request
        .extensions()
        .get::<Deadline>()
        .copied()
        .unwrap_or_else(|| Deadline::after(state.request_timeout));

    let tenant = state
        .authenticator
        .authenticate(api_key, environment, deadline)
        .await
        .map_err(|e| {
            debug!(error = %e, %environment, "Authentication failed");
            ApiError::unauthorized("Unauthorized")
        })?;

    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}
