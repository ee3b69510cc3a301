//! HTTP listener lifecycle.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerSection;
use crate::router::build_router;
use crate::state::AppState;

/// Errors from binding or running the HTTP listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured `host` is not a valid IP address.
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// Binding or serving failed at the socket level.
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind to the configured address and serve the game until the process
/// is terminated.
///
/// # Errors
///
/// Returns [`ServerError`] if the address is invalid, the listener
/// cannot bind, or the server hits a fatal I/O error.
pub async fn start_server(config: &ServerSection, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Geohunt server listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
