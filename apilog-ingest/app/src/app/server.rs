use crate::error::IngestError;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve the ingestion router until SIGINT/SIGTERM or `shutdown_token` is
/// cancelled, then drain in-flight requests.
pub async fn serve(
    app: Router,
    bind_addr: &str,
    shutdown_token: CancellationToken,
) -> Result<(), IngestError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| IngestError::Bind {
            address: bind_addr.to_string(),
            source: e,
        })?;
    info!("Ingestion server listening on {}", listener.local_addr()?);
    info!("  - POST /api/v1/logs        (single entry)");
    info!("  - POST /api/v1/logs/batch  (batched entries)");

    let signal_token = shutdown_token.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::select! {
            () = shutdown_signal() => signal_token.cancel(),
            () = signal_token.cancelled() => {}
        }
    })
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
