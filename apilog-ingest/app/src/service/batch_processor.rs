use super::{ApiLogService, Deadline, LogSubmission};
use crate::domain::{BatchOutcome, TenantContext};
use std::sync::Arc;
use tracing::{debug, info};

/// Stores every entry of a batch independently and tallies the result.
#[derive(Clone)]
pub struct BatchProcessor {
    service: Arc<ApiLogService>,
}

impl BatchProcessor {
    pub fn new(service: Arc<ApiLogService>) -> Self {
        Self { service }
    }

    /// Entries are attempted once each, in order. A failed entry never stops
    /// its siblings; its error text lands in the outcome.
    pub async fn process(
        &self,
        tenant: &TenantContext,
        submissions: Vec<LogSubmission>,
        create_users: bool,
        deadline: Deadline,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::with_total(submissions.len());

        for (index, submission) in submissions.into_iter().enumerate() {
            match self
                .service
                .create_log(tenant, submission, create_users, deadline)
                .await
            {
                Ok(_) => outcome.record_success(),
                Err(e) => {
                    debug!(index, error = %e, "Batch entry rejected");
                    outcome.record_failure(&e);
                }
            }
        }

        info!(
            project_id = %tenant.project_id,
            environment = %tenant.environment,
            total = outcome.total,
            success = outcome.success_count,
            failed = outcome.failed_count,
            "Processed log batch"
        );

        outcome
    }
}
