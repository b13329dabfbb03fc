//! HTTP upload server
//!
//! Serves the upload page and converts posted JSPF files. Each request
//! buffers its upload in memory and converts it on a blocking worker; no
//! state is shared between requests and nothing is written to disk.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Settings;
use crate::convert::ConvertOptions;

pub mod error;
pub mod routes;

pub use error::ServerError;

/// Per-server configuration shared with every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub options: ConvertOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            options: settings.convert_options(),
            max_upload_bytes: settings.max_upload_bytes(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/convert", post(routes::convert_upload))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl-C or SIGTERM
pub async fn serve(settings: &Settings) -> Result<()> {
    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", settings.bind_address))?;

    let app = router(Arc::new(AppState::from_settings(settings)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "Playlist converter listening on http://{} (upload limit {} MiB, missing locations: {:?})",
        addr, settings.max_upload_mb, settings.missing_location
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
