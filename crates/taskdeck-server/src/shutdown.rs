//! Graceful shutdown.
//!
//! Once the stop signal arrives the server flips to draining (so `/readyz`
//! answers 503), keeps serving for `server.shutdown_grace_ms`, and only then
//! lets `axum::serve` stop accepting and wait out in-flight requests.

use std::future::Future;
use std::time::Duration;

use crate::app_state::AppState;

/// Resolves once `signal` fires and the grace window has elapsed.
pub async fn drain_after<F>(state: AppState, signal: F)
where
    F: Future<Output = ()>,
{
    signal.await;

    state.set_draining();
    let grace = Duration::from_millis(state.cfg().server.shutdown_grace_ms);
    tracing::info!(grace_ms = grace.as_millis() as u64, "signal received, draining");
    tokio::time::sleep(grace).await;
}

/// Ctrl+C or SIGTERM.
pub async fn os_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
