use std::sync::Arc;

use guitarcoach::{
    server::{self, LinkState},
    types::SpotifyLink,
};
use tokio::sync::Mutex;

async fn start() -> (String, LinkState) {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state: LinkState = Arc::new(Mutex::new(None));

    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        server::serve(listener, server_state).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn test_callback_records_connected() {
    let (base, state) = start().await;

    let page = reqwest::get(format!("{}/profile?spotify_connected=true", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Spotify connected"));
    assert_eq!(*state.lock().await, Some(SpotifyLink::Connected));
}

#[tokio::test]
async fn test_callback_records_error() {
    let (base, state) = start().await;

    reqwest::get(format!("{}/profile?spotify_error=access_denied", base))
        .await
        .unwrap();

    assert_eq!(
        *state.lock().await,
        Some(SpotifyLink::Failed("access_denied".to_string()))
    );
}

#[tokio::test]
async fn test_callback_without_result_leaves_state_empty() {
    let (base, state) = start().await;

    let page = reqwest::get(format!("{}/profile", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Missing"));
    assert!(state.lock().await.is_none());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (base, _) = start().await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_invalid_address_is_a_config_error() {
    let err = server::bind("not-an-address").await.unwrap_err();
    assert!(err.to_string().contains("not-an-address"));
}
