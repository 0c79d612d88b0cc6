use super::AppState;
use crate::handler::{create_batch_logs, create_log, require_api_key, stamp_deadline};
use axum::Router;
use axum::middleware;
use axum::routing::post;

/// Build the ingestion router.
///
/// Both routes sit behind the API key gate; the deadline is stamped before
/// the gate runs so authentication counts against it.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/logs", post(create_log))
        .route("/api/v1/logs/batch", post(create_batch_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(middleware::from_fn_with_state(
            state.request_timeout,
            stamp_deadline,
        ))
        .with_state(state)
}
