use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::shutdown::shutdown_signal;
use crate::types::AppError;

pub async fn serve(bind_addr: &str, app: Router) -> Result<(), AppError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Initialization(format!("Failed to bind {}: {}", bind_addr, e)))?;

    info!("Backend running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Initialization(format!("HTTP server exited unexpectedly: {}", e)))
}
