// HTTP endpoint layer
//
// - Handlers: POST /transcribe and GET /health
// - Upload: multipart extraction and staging of the video
// - Error: mapping of service errors to `{"detail": ...}` responses

pub mod error;
pub mod handlers;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::HttpError;
pub use handlers::{health_check, transcribe_video};

use crate::config::{ServerConfig, TranscriberConfig};
use crate::error::{Result, ServiceError};
use crate::transcribe::{check_in_worker, SubtitleTool};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub tool: Arc<dyn SubtitleTool>,
    pub transcriber: Arc<TranscriberConfig>,
}

impl AppState {
    pub fn new(tool: Arc<dyn SubtitleTool>, transcriber: TranscriberConfig) -> Self {
        Self {
            tool,
            transcriber: Arc::new(transcriber),
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let transcribe_route = post(transcribe_video).layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/transcribe", transcribe_route.clone())
        .route("/transcribe/", transcribe_route)
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<()> {
    if let Err(e) = check_in_worker(state.tool.clone()).await {
        warn!("Subtitle tool check failed, requests will fail until it is installed: {}", e);
    }
    state.transcriber.ensure_scratch_root()?;

    let router = build_router(state, config.max_upload_bytes());
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Subtitle service listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServiceError::Io)?;

    info!("Subtitle service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
