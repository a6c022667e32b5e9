//! Proxy server setup

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::errors::ControlError;
use crate::server::handlers::{check_handler, health_handler, initiate_handler, version_handler};
use crate::server::state::ProxyState;
use crate::settings::ServerSettings;

/// Build the proxy router
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        // Deploy proxy
        .route("/api/deploy", get(check_handler).post(initiate_handler))
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the proxy server
pub async fn serve(
    options: &ServerSettings,
    state: Arc<ProxyState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), ControlError>>, ControlError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting deploy proxy on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ControlError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ControlError::ServerError(e.to_string()))
    });

    Ok(handle)
}
