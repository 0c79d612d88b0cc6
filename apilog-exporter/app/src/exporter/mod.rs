//! The exporter: a non-blocking `log` front end over an [`EntryQueue`] and a
//! single background worker that performs every send.

mod worker;

use crate::app::config::ExporterConfig;
use crate::buffer::EntryQueue;
use crate::domain::{BatchOutcome, ExportError, LogEntry};
use crate::reliability::ReliableSender;
use crate::sender::{
    BatchTransmitter, BatchTransport, ClientError, ExporterStats, HttpClient, StatsSnapshot,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use worker::{FlushRequest, Worker};

/// Result of a flush: the server's tally, or `None` when nothing was queued.
pub type FlushResult = Result<Option<BatchOutcome>, ExportError>;

const FLUSH_REQUEST_CAPACITY: usize = 16;

pub struct Exporter {
    config: ExporterConfig,
    queue: Arc<EntryQueue>,
    size_trigger: Arc<Notify>,
    flush_requests: Option<mpsc::Sender<FlushRequest>>,
    shutdown_token: CancellationToken,
    worker: Mutex<Option<JoinHandle<FlushResult>>>,
    stats: Arc<ExporterStats>,
}

impl Exporter {
    /// Builds an exporter that sends batches over HTTP. Must be called inside
    /// a Tokio runtime unless the configuration is disabled.
    pub fn new(config: ExporterConfig) -> Result<Self, ExportError> {
        config.validate()?;
        if !config.is_enabled() {
            return Ok(Self::disabled(config));
        }

        let client = HttpClient::new(config.client_config())?;
        let transmitter = BatchTransmitter::new(client)
            .map_err(|e| ClientError::InvalidConfiguration(e.to_string()))?;
        Self::with_transport(config, Arc::new(transmitter))
    }

    /// Builds an exporter over any [`BatchTransport`].
    pub fn with_transport(
        config: ExporterConfig,
        transport: Arc<dyn BatchTransport>,
    ) -> Result<Self, ExportError> {
        config.validate()?;
        if !config.is_enabled() {
            return Ok(Self::disabled(config));
        }

        let queue = Arc::new(EntryQueue::with_capacity(config.batch_size));
        let size_trigger = Arc::new(Notify::new());
        let stats = Arc::new(ExporterStats::new());
        let shutdown_token = CancellationToken::new();
        let (request_tx, request_rx) = mpsc::channel(FLUSH_REQUEST_CAPACITY);

        let worker = Worker {
            queue: Arc::clone(&queue),
            sender: ReliableSender::new(transport, config.retry_policy(), Arc::clone(&stats)),
            batch_size: config.batch_size,
            create_users: config.create_users,
            flush_interval: config.flush_interval(),
            size_trigger: Arc::clone(&size_trigger),
            flush_requests: request_rx,
            shutdown: shutdown_token.clone(),
        };
        let handle = tokio::spawn(worker.run());

        info!(
            base_url = %config.base_url,
            environment = %config.environment,
            batch_size = config.batch_size,
            flush_interval_ms = config.flush_interval_ms,
            "API log exporter started"
        );

        Ok(Self {
            config,
            queue,
            size_trigger,
            flush_requests: Some(request_tx),
            shutdown_token,
            worker: Mutex::new(Some(handle)),
            stats,
        })
    }

    fn disabled(config: ExporterConfig) -> Self {
        info!("API log exporter disabled");
        Self {
            config,
            queue: Arc::new(EntryQueue::new()),
            size_trigger: Arc::new(Notify::new()),
            flush_requests: None,
            shutdown_token: CancellationToken::new(),
            worker: Mutex::new(None),
            stats: Arc::new(ExporterStats::new()),
        }
    }

    /// Queues an entry. Never performs I/O; when the queue reaches
    /// `batch_size` the worker is woken to send a batch.
    pub fn log(&self, entry: LogEntry) {
        if self.flush_requests.is_none() {
            return;
        }

        if self.shutdown_token.is_cancelled() {
            self.stats.record_dropped(1);
            warn!(path = %entry.path, "Exporter is shut down, dropping log entry");
            return;
        }

        if self.queue.push(entry) >= self.config.batch_size {
            self.size_trigger.notify_one();
        }
    }

    /// Sends everything queued right now as one batch and waits for the
    /// result. Entries logged while the send is in flight go to a later batch.
    pub async fn flush(&self) -> FlushResult {
        let Some(requests) = &self.flush_requests else {
            return Ok(None);
        };
        if self.shutdown_token.is_cancelled() {
            return Err(ExportError::ShutDown);
        }

        let (reply, response) = oneshot::channel();
        requests
            .send(FlushRequest { reply })
            .await
            .map_err(|_| ExportError::ShutDown)?;

        response.await.map_err(|_| ExportError::WorkerStopped)?
    }

    /// Stops the flush timer and sends whatever is still queued. Only the
    /// first call does any work; later calls return `Ok(None)`.
    pub async fn shutdown(&self) -> FlushResult {
        self.shutdown_token.cancel();

        let Some(handle) = self.worker.lock().take() else {
            return Ok(None);
        };

        let timeout = self.config.shutdown_timeout();
        let result = match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!(error = %join_error, "Exporter worker panicked");
                Err(ExportError::WorkerStopped)
            }
            Err(_) => {
                error!(?timeout, "Exporter shutdown timed out");
                Err(ExportError::ShutdownTimeout(timeout))
            }
        };

        let stranded = self.queue.take_all().len();
        if stranded > 0 {
            self.stats.record_dropped(stranded);
            warn!(entries = stranded, "Entries queued during shutdown were dropped");
        }

        let stats = self.stats.snapshot();
        info!(
            batches_sent = stats.batches_sent,
            entries_sent = stats.entries_sent,
            entries_dropped = stats.entries_dropped,
            "API log exporter stopped"
        );

        result
    }

    pub fn is_enabled(&self) -> bool {
        self.flush_requests.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }
}

impl Drop for Exporter {
    fn drop(&mut self) {
        // Lets a worker that was never shut down drain and exit on its own.
        self.shutdown_token.cancel();
    }
}
