//! CSV to Excel conversion service.
//!
//! One endpoint, `GET /convert-csv-to-excel`: reads the configured CSV file,
//! builds a single-sheet workbook and returns it as an `.xlsx` attachment.
//! Requests share nothing but read-only configuration.

pub mod artifact;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

pub use config::{DeliveryMode, ServerConfig};
pub use error::{AppError, ErrorBody};
pub use routes::{router, AppState, CONVERT_PATH};

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        "listening on {} (source: {}, delivery: {:?})",
        listener.local_addr()?,
        config.source_path().display(),
        config.delivery
    );

    let app = router(Arc::new(AppState::new(config)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, never resolve
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
