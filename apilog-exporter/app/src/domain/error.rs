use crate::app::config::ConfigError;
use crate::domain::BatchOutcome;
use crate::sender::{ClientError, TransmissionError};
use std::time::Duration;
use thiserror::Error;

/// Error returned by `Exporter::flush` and `Exporter::shutdown`.
///
/// Every variant that carries `dropped` means those entries were removed from
/// the queue and will not be sent again.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Batch {batch_id} dropped after {attempts} attempts ({dropped} entries): {source}")]
    RetriesExhausted {
        batch_id: String,
        attempts: u32,
        dropped: usize,
        #[source]
        source: TransmissionError,
    },

    #[error("Batch {batch_id} failed ({dropped} entries): {source}")]
    Failed {
        batch_id: String,
        dropped: usize,
        #[source]
        source: TransmissionError,
    },

    #[error("Exporter has been shut down")]
    ShutDown,

    #[error("Exporter worker stopped unexpectedly")]
    WorkerStopped,

    #[error("Shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("HTTP client error: {0}")]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExportError {
    /// Number of entries lost with this error.
    pub fn dropped(&self) -> usize {
        match self {
            ExportError::RetriesExhausted { dropped, .. } | ExportError::Failed { dropped, .. } => {
                *dropped
            }
            _ => 0,
        }
    }

    /// The server's tally when the batch was answered with a non-2xx status.
    pub fn rejected_outcome(&self) -> Option<&BatchOutcome> {
        match self {
            ExportError::Failed {
                source: TransmissionError::Rejected { outcome, .. },
                ..
            } => outcome.as_ref(),
            _ => None,
        }
    }
}
