use tokio::signal;

/// Resolve on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still triggers shutdown.
pub async fn shutdown_signal() {
    tokio::select! {
        () = ctrl_c() => tracing::info!("Received Ctrl+C signal"),
        () = sigterm() => tracing::info!("Received SIGTERM signal"),
    }
    tracing::info!("Shutdown signal received, draining connections");
}

async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(%e, "Error handling Ctrl+C signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
        }
        Err(e) => {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
