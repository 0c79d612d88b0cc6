#![allow(dead_code)]

use apilog_exporter::buffer::Batch;
use apilog_exporter::sender::{BatchTransport, TransmissionError};
use apilog_exporter::{BatchOutcome, ExporterConfig, HttpMethod, LogEntry};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::Instant;

/// In-process transport that records every attempt and every delivered
/// batch. Scripted failures are returned, in order, before deliveries succeed.
#[derive(Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<TransmissionError>>,
    attempts: Mutex<Vec<Instant>>,
    delivered: Mutex<Vec<Batch>>,
    latency: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn failing_with(failures: Vec<TransmissionError>) -> Self {
        Self {
            script: Mutex::new(failures.into()),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().clone()
    }

    pub fn batches(&self) -> Vec<Batch> {
        self.delivered.lock().clone()
    }

    pub fn delivered_paths(&self) -> Vec<String> {
        self.delivered
            .lock()
            .iter()
            .flat_map(|batch| batch.entries().iter().map(|e| e.path.clone()))
            .collect()
    }
}

impl BatchTransport for RecordingTransport {
    fn send_batch<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome, TransmissionError>> + Send + 'a>> {
        Box::pin(async move {
            self.attempts.lock().push(Instant::now());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }

            let scripted = self.script.lock().pop_front();
            if let Some(error) = scripted {
                return Err(error);
            }

            self.delivered.lock().push(batch.clone());
            Ok(BatchOutcome {
                success_count: batch.size(),
                failed_count: 0,
                total: batch.size(),
                errors: vec![],
            })
        })
    }
}

pub fn test_config(batch_size: usize, flush_interval_ms: u64) -> ExporterConfig {
    ExporterConfig {
        api_key: "test-key".to_string(),
        batch_size,
        flush_interval_ms,
        max_retries: 3,
        retry_delay_ms: 100,
        max_retry_delay_ms: 1_000,
        ..ExporterConfig::default()
    }
}

pub fn entry(path: impl Into<String>) -> LogEntry {
    LogEntry::new(HttpMethod::Get, path, 200).with_response_time(12)
}

/// Polls until `transport` has delivered `count` batches or `limit` passes.
pub async fn wait_for_batches(transport: &RecordingTransport, count: usize, limit: Duration) {
    let deadline = Instant::now() + limit;
    while transport.batches().len() < count {
        assert!(
            Instant::now() < deadline,
            "expected {count} batches, got {}",
            transport.batches().len()
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
