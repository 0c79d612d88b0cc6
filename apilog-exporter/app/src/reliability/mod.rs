pub mod retry;

pub use retry::RetryPolicy;

use crate::buffer::Batch;
use crate::domain::{BatchOutcome, ExportError};
use crate::sender::{BatchTransport, ExporterStats, TransmissionError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sends a batch through a transport, retrying transport-level failures with
/// backoff. The batch is borrowed for every attempt, so each retry carries the
/// same entries in the same order.
pub struct ReliableSender {
    transport: Arc<dyn BatchTransport>,
    policy: RetryPolicy,
    stats: Arc<ExporterStats>,
}

impl ReliableSender {
    pub fn new(
        transport: Arc<dyn BatchTransport>,
        policy: RetryPolicy,
        stats: Arc<ExporterStats>,
    ) -> Self {
        Self {
            transport,
            policy,
            stats,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Delivers `batch` and updates the exporter counters. On error the
    /// batch's entries are counted as dropped.
    pub async fn send(&self, batch: &Batch) -> Result<BatchOutcome, ExportError> {
        let result = self.attempt_with_retries(batch).await;

        match &result {
            Ok(outcome) => {
                self.stats.record_sent(batch.size());
                if !outcome.is_complete_success() {
                    warn!(
                        batch_id = batch.id(),
                        failed = outcome.failed_count,
                        total = outcome.total,
                        errors = ?outcome.errors,
                        "Server rejected some entries"
                    );
                }
            }
            Err(e) => {
                self.stats.record_dropped(batch.size());
                if matches!(
                    e,
                    ExportError::Failed {
                        source: TransmissionError::Rejected { .. },
                        ..
                    }
                ) {
                    self.stats.record_rejected();
                }
                error!(
                    batch_id = batch.id(),
                    trigger = %batch.trigger(),
                    dropped = batch.size(),
                    age = ?batch.age(),
                    error = %e,
                    "Dropping batch"
                );
            }
        }

        result
    }

    async fn attempt_with_retries(&self, batch: &Batch) -> Result<BatchOutcome, ExportError> {
        let mut retry = 0;

        loop {
            let error = match self.transport.send_batch(batch).await {
                Ok(outcome) => {
                    if retry > 0 {
                        info!(
                            batch_id = batch.id(),
                            attempt = retry + 1,
                            "Batch delivered after retry"
                        );
                    }
                    return Ok(outcome);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(ExportError::Failed {
                    batch_id: batch.id().to_string(),
                    dropped: batch.size(),
                    source: error,
                });
            }

            if retry >= self.policy.max_retries {
                return Err(ExportError::RetriesExhausted {
                    batch_id: batch.id().to_string(),
                    attempts: retry + 1,
                    dropped: batch.size(),
                    source: error,
                });
            }

            let delay = self.policy.delay_for(retry);
            retry += 1;
            self.stats.record_retry();
            warn!(
                batch_id = batch.id(),
                attempt = retry,
                max_attempts = self.policy.max_attempts(),
                ?delay,
                error = %error,
                "Batch transmission failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
