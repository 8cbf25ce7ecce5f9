use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::LinkState, types::SpotifyLink};

pub async fn spotify_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<LinkState>,
) -> Html<&'static str> {
    let Some(outcome) = link_outcome(&params) else {
        return Html("<h4>Missing Spotify link result.</h4>");
    };

    let page = match &outcome {
        SpotifyLink::Connected => {
            Html("<h2>Spotify connected.</h2><p>You can close this window.</p>")
        }
        SpotifyLink::Failed(_) => Html("<h4>Connecting Spotify failed.</h4>"),
    };

    *shared_state.lock().await = Some(outcome);
    page
}

/// Reads `spotify_connected=true` or `spotify_error=<reason>` from a redirect.
pub fn link_outcome(params: &HashMap<String, String>) -> Option<SpotifyLink> {
    if let Some(reason) = params.get("spotify_error") {
        return Some(SpotifyLink::Failed(reason.clone()));
    }
    match params.get("spotify_connected").map(String::as_str) {
        Some("true") => Some(SpotifyLink::Connected),
        _ => None,
    }
}
