mod common;

use apilog_exporter::app::forward_lines;
use apilog_exporter::buffer::BatchTrigger;
use apilog_exporter::{ExportError, Exporter, ExporterConfig};
use common::{RecordingTransport, entry, test_config, wait_for_batches};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const HOUR_MS: u64 = 3_600_000;

#[tokio::test]
async fn size_trigger_sends_exactly_the_first_batch_size_entries() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(5, HOUR_MS), transport.clone()).unwrap();

    for i in 0..7 {
        exporter.log(entry(format!("/{i}")));
    }

    wait_for_batches(&transport, 1, Duration::from_secs(2)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let batches = transport.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].trigger(), BatchTrigger::Size);
    let paths: Vec<_> = batches[0].entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["/0", "/1", "/2", "/3", "/4"]);
    assert_eq!(exporter.queued(), 2);

    let outcome = exporter.shutdown().await.unwrap().unwrap();
    assert_eq!(outcome.total, 2);
}

#[tokio::test]
async fn size_trigger_cuts_consecutive_full_batches() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(5, HOUR_MS), transport.clone()).unwrap();

    for i in 0..12 {
        exporter.log(entry(format!("/{i}")));
    }

    wait_for_batches(&transport, 2, Duration::from_secs(2)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let batches = transport.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].entries()[0].path, "/0");
    assert_eq!(batches[1].entries()[0].path, "/5");
    assert!(batches.iter().all(|b| b.size() == 5));
    assert_eq!(exporter.queued(), 2);

    exporter.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn timer_flushes_a_partial_queue_once() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(100, 1_000), transport.clone()).unwrap();

    for i in 0..3 {
        exporter.log(entry(format!("/{i}")));
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(transport.batches().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let batches = transport.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].size(), 3);
    assert_eq!(batches[0].trigger(), BatchTrigger::Timer);

    // Idle ticks send nothing.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.batches().len(), 1);

    assert!(exporter.shutdown().await.unwrap().is_none());
}

#[tokio::test]
async fn pending_flush_request_is_served_before_size_trigger() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(2, HOUR_MS), transport.clone()).unwrap();

    exporter.log(entry("/a"));
    exporter.log(entry("/b"));
    let outcome = exporter.flush().await.unwrap().unwrap();

    assert_eq!(outcome.total, 2);
    let batches = transport.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].trigger(), BatchTrigger::Manual);
    assert!(exporter.shutdown().await.unwrap().is_none());
}

#[tokio::test]
async fn manual_flush_returns_the_outcome() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(100, HOUR_MS), transport.clone()).unwrap();

    assert!(exporter.flush().await.unwrap().is_none());

    exporter.log(entry("/a"));
    exporter.log(entry("/b"));
    let outcome = exporter.flush().await.unwrap().unwrap();

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.total, 2);
    assert_eq!(exporter.queued(), 0);
    assert_eq!(transport.batches()[0].trigger(), BatchTrigger::Manual);

    let stats = exporter.stats();
    assert_eq!(stats.batches_sent, 1);
    assert_eq!(stats.entries_sent, 2);

    exporter.shutdown().await.unwrap();
}

#[tokio::test]
async fn create_users_flag_travels_with_every_batch() {
    let transport = Arc::new(RecordingTransport::new());
    let config = ExporterConfig {
        create_users: true,
        ..test_config(100, HOUR_MS)
    };
    let exporter = Exporter::with_transport(config, transport.clone()).unwrap();

    exporter.log(entry("/a").with_user_identifier("alice@example.com", None));
    exporter.flush().await.unwrap();

    assert!(transport.batches()[0].create_users());
    exporter.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logging_during_flushes_neither_drops_nor_duplicates() {
    let transport = Arc::new(RecordingTransport::with_latency(Duration::from_millis(2)));
    let exporter =
        Arc::new(Exporter::with_transport(test_config(50, 20), transport.clone()).unwrap());

    let mut tasks = Vec::new();
    for producer in 0..4 {
        let exporter = Arc::clone(&exporter);
        tasks.push(tokio::spawn(async move {
            for i in 0..500 {
                exporter.log(entry(format!("/p{producer}/{i}")));
                if i % 25 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }

    let flusher = {
        let exporter = Arc::clone(&exporter);
        tokio::spawn(async move {
            for _ in 0..20 {
                exporter.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
    };

    for task in tasks {
        task.await.unwrap();
    }
    flusher.await.unwrap();
    exporter.shutdown().await.unwrap();

    let paths = transport.delivered_paths();
    let unique: HashSet<_> = paths.iter().collect();
    assert_eq!(paths.len(), 2_000);
    assert_eq!(unique.len(), 2_000);
    assert_eq!(exporter.stats().entries_dropped, 0);
}

#[tokio::test]
async fn shutdown_flushes_once_and_is_idempotent() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(100, HOUR_MS), transport.clone()).unwrap();

    for i in 0..3 {
        exporter.log(entry(format!("/{i}")));
    }

    let outcome = exporter.shutdown().await.unwrap().unwrap();
    assert_eq!(outcome.total, 3);
    assert!(exporter.shutdown().await.unwrap().is_none());

    let batches = transport.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].trigger(), BatchTrigger::Shutdown);

    assert!(matches!(exporter.flush().await, Err(ExportError::ShutDown)));

    exporter.log(entry("/late"));
    assert_eq!(exporter.queued(), 0);
    assert_eq!(exporter.stats().entries_dropped, 1);
}

#[tokio::test]
async fn disabled_exporter_is_a_no_op() {
    let transport = Arc::new(RecordingTransport::new());
    let config = ExporterConfig {
        disabled: true,
        ..ExporterConfig::default()
    };
    let exporter = Exporter::with_transport(config, transport.clone()).unwrap();

    assert!(!exporter.is_enabled());
    exporter.log(entry("/ignored"));
    assert_eq!(exporter.queued(), 0);
    assert!(exporter.flush().await.unwrap().is_none());
    assert!(exporter.shutdown().await.unwrap().is_none());
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn invalid_config_is_rejected_at_construction() {
    let transport = Arc::new(RecordingTransport::new());
    let result = Exporter::with_transport(ExporterConfig::default(), transport);
    assert!(matches!(result, Err(ExportError::Config(_))));
}

#[tokio::test]
async fn forward_lines_skips_blank_and_malformed_lines() {
    let transport = Arc::new(RecordingTransport::new());
    let exporter = Exporter::with_transport(test_config(100, HOUR_MS), transport.clone()).unwrap();

    let input = concat!(
        r#"{"method":"GET","path":"/a","status_code":200}"#,
        "\n\n",
        "not json\n",
        r#"{"method":"POST","path":"/b","status_code":201,"user_identifier":"u-1"}"#,
        "\n",
    );

    let forwarded = forward_lines(input.as_bytes(), &exporter).await.unwrap();
    assert_eq!(forwarded, 2);
    assert_eq!(exporter.queued(), 2);

    exporter.shutdown().await.unwrap();
    assert_eq!(transport.delivered_paths(), ["/a", "/b"]);
}
