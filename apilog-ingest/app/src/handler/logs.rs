use super::payload::{BatchLogRequest, CreatedLog, DataEnvelope, SingleLogRequest};
use super::{ApiError, RequestMeta};
use crate::app::AppState;
use crate::domain::{BatchOutcome, BatchStatus, DomainError, TenantContext};
use crate::service::Deadline;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::{error, info};

/// Handler for POST /api/v1/logs/batch
///
/// 201 when every entry was stored, 206 when some were, 500 when none were.
/// The tally is returned in all three cases.
pub async fn create_batch_logs(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    deadline: Deadline,
    meta: RequestMeta,
    payload: Result<Json<BatchLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<BatchOutcome>>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    if request.logs.is_empty() {
        return Err(ApiError::bad_request("logs must contain at least one entry"));
    }

    info!(
        project_id = %tenant.project_id,
        entries = request.logs.len(),
        create_users = request.create_users,
        "Received log batch"
    );

    let submissions = request
        .logs
        .into_iter()
        .map(|entry| entry.into_submission(&meta))
        .collect();

    let outcome = state
        .processor
        .process(&tenant, submissions, request.create_users, deadline)
        .await;

    let status = match outcome.status() {
        BatchStatus::Complete => StatusCode::CREATED,
        BatchStatus::Partial => StatusCode::PARTIAL_CONTENT,
        BatchStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Ok((status, Json(DataEnvelope { data: outcome })))
}

/// Handler for POST /api/v1/logs
pub async fn create_log(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    deadline: Deadline,
    meta: RequestMeta,
    payload: Result<Json<SingleLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<CreatedLog>>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let submission = request.entry.into_submission(&meta);
    let log = state
        .service
        .create_log(&tenant, submission, request.create_users, deadline)
        .await
        .map_err(|e| match e {
            DomainError::InvalidInput(_) | DomainError::InvalidEnvironment => {
                ApiError::bad_request(e.to_string())
            }
            other => {
                error!(project_id = %tenant.project_id, error = %other, "Failed to create log");
                ApiError::internal("Failed to create log")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope {
            data: CreatedLog {
                id: log.id,
                timestamp: log.timestamp,
            },
        }),
    ))
}
