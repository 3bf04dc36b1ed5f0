use tokio::signal;

/// Completes on Ctrl+C, or on SIGTERM on unix
///
/// Pass it to a host's `serve` as the graceful shutdown trigger:
///
/// ```rust,ignore
/// app.serve(listener, shutdown_signal()).await?;
/// ```
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let received = tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = terminate() => "SIGTERM",
    };
    tracing::info!("Received {}, shutting down", received);
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use signal::unix::SignalKind;

    match signal::unix::signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!("Cannot listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
