//! Binding and serving the observer.
//!
//! [`spawn_observer`] is what the engine uses: it checks the address up
//! front and then serves from a background task, so the observer runs
//! concurrently with the tick loop. [`start_server`] serves in the
//! current task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Listen address of the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] when `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let text = format!("{}:{}", self.host, self.port);
        text.parse().map_err(|_| ServerError::Address(text))
    }
}

/// Failure to bring up or keep running the observer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured host and port do not form a socket address.
    #[error("invalid observer address: {0}")]
    Address(String),

    /// The listener could not bind.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// Address that was tried.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("serve error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind and serve until the listener fails.
///
/// # Errors
///
/// Returns [`ServerError`] when the address is invalid, the bind fails, or
/// serving stops with an I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "Observer listening");

    axum::serve(listener, build_router(state))
        .await
        .map_err(ServerError::Serve)
}

/// Serve the observer from a background task.
///
/// # Errors
///
/// Returns [`ServerError::Address`] before spawning when the address does
/// not parse. Bind and serve failures happen inside the task and are
/// logged there.
pub fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, ServerError> {
    let addr = config.socket_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(&config, state).await {
            error!(error = %e, "Observer stopped");
        }
    });
    info!(%addr, "Observer task spawned");
    Ok(handle)
}
