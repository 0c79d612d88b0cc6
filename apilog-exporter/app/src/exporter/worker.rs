use super::FlushResult;
use crate::buffer::{Batch, BatchTrigger, EntryQueue};
use crate::domain::{BatchOutcome, ExportError, LogEntry};
use crate::reliability::ReliableSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub(super) struct FlushRequest {
    pub reply: oneshot::Sender<FlushResult>,
}

/// Owns every send of one exporter, so at most one batch is in flight.
pub(super) struct Worker {
    pub queue: Arc<EntryQueue>,
    pub sender: ReliableSender,
    pub batch_size: usize,
    pub create_users: bool,
    pub flush_interval: Duration,
    pub size_trigger: Arc<Notify>,
    pub flush_requests: mpsc::Receiver<FlushRequest>,
    pub shutdown: CancellationToken,
}

impl Worker {
    pub async fn run(mut self) -> FlushResult {
        let mut ticker = interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                Some(request) = self.flush_requests.recv() => {
                    let result = self.flush_all(BatchTrigger::Manual).await;
                    if request.reply.send(result).is_err() {
                        debug!("Flush caller went away before the result was ready");
                    }
                }

                () = self.size_trigger.notified() => self.flush_full_batches().await,

                _ = ticker.tick() => {
                    if let Err(e) = self.flush_all(BatchTrigger::Timer).await {
                        error!(error = %e, "Periodic flush failed");
                    }
                }
            }
        }

        self.flush_requests.close();
        let result = self.flush_all(BatchTrigger::Shutdown).await;

        // Their entries, if any, travelled in the final batch.
        while let Ok(request) = self.flush_requests.try_recv() {
            let _ = request.reply.send(Ok(None));
        }

        info!("Exporter worker stopped");
        result
    }

    async fn flush_full_batches(&self) {
        while self.queue.len() >= self.batch_size {
            let entries = self.queue.take_front(self.batch_size);
            if let Err(e) = self.send(entries, BatchTrigger::Size).await {
                error!(error = %e, "Size-triggered flush failed");
            }
        }
    }

    async fn flush_all(&self, trigger: BatchTrigger) -> FlushResult {
        if self.queue.is_empty() {
            return Ok(None);
        }
        let entries = self.queue.take_all();
        if entries.is_empty() {
            return Ok(None);
        }
        self.send(entries, trigger).await.map(Some)
    }

    async fn send(
        &self,
        entries: Vec<LogEntry>,
        trigger: BatchTrigger,
    ) -> Result<BatchOutcome, ExportError> {
        let batch = Batch::new(entries, self.create_users, trigger);
        debug!(
            batch_id = batch.id(),
            entries = batch.size(),
            %trigger,
            "Flushing batch"
        );
        self.sender.send(&batch).await
    }
}
