//! Serving the router until shutdown.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::airports::Airports;

use super::routes::create_router;
use super::state::AppState;

/// Serve until `shutdown` resolves, then flush the search cache.
///
/// In-flight requests finish before the flush, so the snapshot on disk
/// holds the final recency order.
pub async fn serve(
    listener: TcpListener,
    airports: Airports,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = create_router(AppState::new(airports.clone()));

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    info!(entries = airports.search_cache().len(), "flushing search cache");
    airports.search_cache().flush();

    result
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
