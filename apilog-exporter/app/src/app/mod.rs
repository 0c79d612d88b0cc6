pub mod config;
pub mod tracing;

pub use config::{ConfigError, ExporterConfig};

use crate::domain::LogEntry;
use crate::exporter::Exporter;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Entry point of the `apilog-exporter` binary: forwards newline-delimited
/// JSON log entries from stdin until EOF or Ctrl+C, then flushes once more.
pub async fn run() -> anyhow::Result<()> {
    tracing::init_tracing();

    let config = ExporterConfig::from_args(std::env::args_os())
        .context("failed to load exporter configuration")?;
    ::tracing::info!(
        "Starting apilog-exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    let exporter = Exporter::new(config).context("failed to start exporter")?;

    tokio::select! {
        result = forward_lines(tokio::io::stdin(), &exporter) => {
            let forwarded = result.context("failed to read stdin")?;
            ::tracing::info!(forwarded, "Input closed");
        }
        _ = tokio::signal::ctrl_c() => {
            ::tracing::info!("Interrupt received");
        }
    }

    let outcome = exporter
        .shutdown()
        .await
        .context("final flush failed")?;
    if let Some(outcome) = outcome {
        ::tracing::info!(
            success = outcome.success_count,
            failed = outcome.failed_count,
            "Final batch delivered"
        );
    }

    Ok(())
}

/// Feeds every parseable line of `input` to the exporter and returns how many
/// entries were queued. Malformed lines are logged and skipped.
pub async fn forward_lines<R>(input: R, exporter: &Exporter) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut forwarded = 0;
    let mut line_number = 0_usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => {
                exporter.log(entry);
                forwarded += 1;
            }
            Err(e) => {
                ::tracing::warn!(line = line_number, error = %e, "Skipping malformed log entry");
            }
        }
    }

    Ok(forwarded)
}
