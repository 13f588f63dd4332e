// Single-page analyzer server - Axum HTTP server
// Serves the embedded page plus the JSON/multipart API behind it

pub mod routes;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::ai::{Credential, TextGenerator};
use crate::config::MAX_UPLOAD_BYTES;

/// The single-page UI
pub const INDEX_HTML: &str = include_str!("index.html");

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind to any port near {0}")]
    Bind(u16),

    #[error("Failed to get local addr: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Shared state for the analyzer server
pub struct AppState<G> {
    /// Backend used for every classification
    pub generator: G,
    /// Key read from the environment at startup, used when a request brings none
    pub default_credential: Option<Credential>,
}

impl<G> AppState<G> {
    /// Resolve the key for one request. Never stored back into the state.
    pub fn credential_for(&self, submitted: Option<String>) -> Option<Credential> {
        Credential::resolve(submitted, self.default_credential.as_ref())
    }
}

/// Holds the running server's shutdown mechanism
pub struct RunningServer {
    pub shutdown_tx: oneshot::Sender<()>,
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// Signal shutdown and wait for in-flight requests to drain
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(());
        self.handle.await?;
        Ok(())
    }
}

/// Build the full router for a given backend
pub fn build_router<G: TextGenerator + 'static>(state: Arc<AppState<G>>) -> Router {
    // CORS configuration - the page is served from the same origin, this only
    // matters for local tooling hitting the API directly
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    routes::api_routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}

/// Start the analyzer HTTP server on the given host and port.
/// Returns the running server handle (for shutdown) or an error.
pub async fn start_server<G: TextGenerator + 'static>(
    host: IpAddr,
    port: u16,
    state: Arc<AppState<G>>,
) -> Result<RunningServer, ServerError> {
    let app = build_router(state);

    let listener = try_bind(host, port).await?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tracing::info!(addr = %addr, "Server starting");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Shutdown signal received, draining connections...");
            })
            .await
        {
            tracing::error!("Server error: {e}");
        }
        tracing::info!("Server stopped");
    });

    Ok(RunningServer {
        shutdown_tx,
        addr,
        handle,
    })
}

/// Try to bind to the given port, with fallback to nearby ports then OS-assigned
async fn try_bind(host: IpAddr, preferred_port: u16) -> Result<TcpListener, ServerError> {
    if let Ok(listener) = TcpListener::bind(SocketAddr::new(host, preferred_port)).await {
        return Ok(listener);
    }

    // Try ports preferred+1 through preferred+10
    for offset in 1..=10u16 {
        let port = preferred_port.saturating_add(offset);
        if let Ok(listener) = TcpListener::bind(SocketAddr::new(host, port)).await {
            tracing::warn!("Port {preferred_port} unavailable, using {port}");
            return Ok(listener);
        }
    }

    // Fall back to OS-assigned port
    match TcpListener::bind(SocketAddr::new(host, 0)).await {
        Ok(listener) => {
            tracing::warn!("All preferred ports unavailable, OS assigned a port");
            Ok(listener)
        }
        Err(_) => Err(ServerError::Bind(preferred_port)),
    }
}
