use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::debug;

use crate::{api, error::CoachError, types::SpotifyLink};

/// Shared slot the callback handler fills once the backend redirects back.
pub type LinkState = Arc<Mutex<Option<SpotifyLink>>>;

pub fn router(state: LinkState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/profile", get(api::spotify_callback).layer(Extension(state)))
}

/// Binds `addr` and returns the listener, so bind errors surface before the
/// browser is opened.
pub async fn bind(addr: &str) -> Result<TcpListener, CoachError> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| CoachError::Config(format!("invalid server address '{}': {}", addr, e)))?;
    Ok(TcpListener::bind(addr).await?)
}

pub async fn serve(listener: TcpListener, state: LinkState) -> Result<(), CoachError> {
    if let Ok(addr) = listener.local_addr() {
        debug!(%addr, "callback server listening");
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}
