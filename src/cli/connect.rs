use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use super::{access_token, identity_client};
use crate::{
    backend::BackendClient,
    config, error, info,
    server::{self, LinkState},
    success,
    types::SpotifyLink,
    utils, warning,
};

const MAX_WAIT: Duration = Duration::from_secs(60);

pub async fn connect_spotify() {
    let identity = identity_client();
    let token = access_token(&identity).await;
    let backend = BackendClient::from_config();

    let login_url = match backend.spotify_login_url(&token) {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    let listener = match server::bind(&config::server_addr()).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot start callback server: {}", e),
    };

    let state: LinkState = Arc::new(Mutex::new(None));
    let server_state = Arc::clone(&state);
    let server = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            tracing::error!(error = %e, "callback server stopped");
        }
    });

    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    info!("Waiting for Spotify authorization...");
    let pb = utils::spinner("Waiting for Spotify authorization...");
    let outcome = wait_for_link(state, MAX_WAIT).await;
    pb.finish_and_clear();
    server.abort();

    match outcome {
        Some(SpotifyLink::Connected) => success!("Spotify connected!"),
        Some(SpotifyLink::Failed(reason)) => error!("Connecting Spotify failed: {}", reason),
        None => error!("Connecting Spotify failed or timed out."),
    }
}

/// Polls the callback slot once a second until it is filled or `max_wait` passes.
pub async fn wait_for_link(state: LinkState, max_wait: Duration) -> Option<SpotifyLink> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Some(outcome) = state.lock().await.take() {
            return Some(outcome);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
