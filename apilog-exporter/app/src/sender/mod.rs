pub mod client;
pub mod stats;
pub mod transmission;

pub use client::{ClientConfig, ClientError, HttpClient};
pub use stats::{ExporterStats, StatsSnapshot};
pub use transmission::{BatchTransmitter, TransmissionError};

use crate::buffer::Batch;
use crate::domain::BatchOutcome;
use std::future::Future;
use std::pin::Pin;

/// One delivery attempt of a batch. The exporter owns retries; implementations
/// send exactly once per call.
pub trait BatchTransport: Send + Sync {
    fn send_batch<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome, TransmissionError>> + Send + 'a>>;
}
