use super::{BatchTransport, HttpClient};
use crate::buffer::Batch;
use crate::domain::wire::{DataEnvelope, ErrorEnvelope};
use crate::domain::{BatchOutcome, BatchRequest};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug)]
pub enum TransmissionError {
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Transmission timeout after {0:?}")]
    Timeout(Duration),
    #[error("Request interrupted: {0}")]
    Interrupted(#[source] reqwest::Error),
    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),
    #[error("Batch rejected with HTTP {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
        outcome: Option<BatchOutcome>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Response body from HTTP {status} could not be read: {message}")]
    IncompleteResponse { status: u16, message: String },
}

impl TransmissionError {
    /// Connection-level failures and timeouts before a response are worth
    /// another attempt. Once a status line arrives the server has attempted
    /// every entry, so anything after that is final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransmissionError::ConnectionFailed(_)
                | TransmissionError::Timeout(_)
                | TransmissionError::Interrupted(_)
        )
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransmissionError::Timeout(timeout)
        } else if err.is_connect() {
            TransmissionError::ConnectionFailed(err.to_string())
        } else if err.is_request() || err.is_body() {
            TransmissionError::Interrupted(err)
        } else {
            TransmissionError::Request(err)
        }
    }
}

/// HTTP implementation of [`BatchTransport`] against the ingestion server.
#[derive(Debug, Clone)]
pub struct BatchTransmitter {
    pub client: HttpClient,
    api_key: HeaderValue,
    environment: HeaderValue,
}

impl BatchTransmitter {
    pub fn new(client: HttpClient) -> Result<Self, TransmissionError> {
        let mut api_key = HeaderValue::from_str(&client.config.api_key)
            .map_err(|e| TransmissionError::InvalidHeaderValue(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);
        let environment = HeaderValue::from_static(client.config.environment.as_str());

        Ok(Self {
            client,
            api_key,
            environment,
        })
    }

    pub fn prepare_payload(&self, batch: &Batch) -> Result<Vec<u8>, TransmissionError> {
        let request = BatchRequest {
            logs: batch.entries(),
            create_users: batch.create_users(),
        };
        Ok(serde_json::to_vec(&request)?)
    }

    pub fn build_headers(&self, batch: &Batch) -> Result<HeaderMap, TransmissionError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static("x-api-key"), self.api_key.clone());
        headers.insert(
            HeaderName::from_static("x-environment"),
            self.environment.clone(),
        );
        headers.insert(
            HeaderName::from_static("x-batch-id"),
            HeaderValue::from_str(batch.id()).map_err(|e| {
                TransmissionError::InvalidHeaderValue(format!("Invalid batch ID: {e}"))
            })?,
        );

        Ok(headers)
    }

    async fn transmit(&self, batch: &Batch) -> Result<BatchOutcome, TransmissionError> {
        let start = Instant::now();
        let timeout = self.client.config.timeout;
        let payload = self.prepare_payload(batch)?;
        let bytes_sent = payload.len();
        let headers = self.build_headers(batch)?;

        debug!(
            batch_id = batch.id(),
            entries = batch.size(),
            bytes = bytes_sent,
            "Sending batch"
        );

        let response = self
            .client
            .client
            .post(self.client.batch_url.clone())
            .headers(headers)
            .timeout(timeout)
            .body(payload)
            .send()
            .await
            .map_err(|e| TransmissionError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(
                batch_id = batch.id(),
                status = status.as_u16(),
                error = %e,
                "Response body could not be read"
            );
            TransmissionError::IncompleteResponse {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })?;
        let latency = start.elapsed();

        if status.is_success() {
            let envelope: DataEnvelope<BatchOutcome> = serde_json::from_str(&body)
                .map_err(|e| TransmissionError::InvalidResponse(e.to_string()))?;
            info!(
                batch_id = batch.id(),
                status = status.as_u16(),
                success = envelope.data.success_count,
                failed = envelope.data.failed_count,
                bytes = bytes_sent,
                ?latency,
                "Batch delivered"
            );
            return Ok(envelope.data);
        }

        // Non-2xx batch answers may still carry the tally (HTTP 500 when every
        // entry failed) or an {"error": ...} body.
        let outcome = serde_json::from_str::<DataEnvelope<BatchOutcome>>(&body)
            .ok()
            .map(|envelope| envelope.data);
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or_else(|_| truncate(&body, MAX_ERROR_BODY));

        warn!(
            batch_id = batch.id(),
            status = status.as_u16(),
            %message,
            "Batch rejected by server"
        );

        Err(TransmissionError::Rejected {
            status: status.as_u16(),
            message,
            outcome,
        })
    }
}

impl BatchTransport for BatchTransmitter {
    fn send_batch<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome, TransmissionError>> + Send + 'a>> {
        Box::pin(self.transmit(batch))
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
