use std::sync::Arc;

use async_trait::async_trait;
use guitarcoach::{
    backend::BackendClient,
    cli::{SongsCommand, dispatch},
    error::CoachError,
    identity::IdentityProvider,
    management::{SongHistory, StateManager},
    recommend::FindSongs,
    store::ViewPhase,
    types::{DifficultyAdjustment, Profile, ProfileUpdate, Session, TimeRange, User},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Identity provider returning a fixed session outcome.
enum FakeIdentity {
    LoggedIn,
    LoggedOut,
    Broken,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_session(&self) -> Result<Option<Session>, CoachError> {
        match self {
            FakeIdentity::LoggedIn => Ok(Some(Session {
                access_token: "tok".to_string(),
                refresh_token: "refresh".to_string(),
                expires_in: 3600,
                obtained_at: 0,
                user: None,
            })),
            FakeIdentity::LoggedOut => Ok(None),
            FakeIdentity::Broken => Err(CoachError::SessionError("refresh rejected".to_string())),
        }
    }

    async fn get_user(&self) -> Result<Option<User>, CoachError> {
        Ok(None)
    }

    async fn fetch_profile(&self, _user_id: &str) -> Result<Option<Profile>, CoachError> {
        Ok(None)
    }

    async fn update_profile(&self, _user_id: &str, _update: &ProfileUpdate) -> Result<(), CoachError> {
        Ok(())
    }
}

fn tracks_json(n: usize) -> Value {
    let items: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "id": format!("t{}", i),
                "name": format!("Track {}", i),
                "artists": [{ "id": format!("a{}", i), "name": format!("Artist {}", i) }],
                "album": { "name": "Album", "images": [] }
            })
        })
        .collect();
    json!({ "items": items })
}

fn artists_json(n: usize) -> Value {
    let items: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "id": format!("a{}", i),
                "name": format!("Artist {}", i),
                "images": [],
                "genres": ["rock", "indie"]
            })
        })
        .collect();
    json!({ "items": items })
}

fn recommendation_json(name: &str, difficulty: i64) -> Value {
    json!({
        "name": name,
        "artist": "Oasis",
        "difficulty": difficulty,
        "skills": ["open chords", "strumming"],
        "description": "A campfire classic."
    })
}

async fn mount_history(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tracks_json(10)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-artists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(artists_json(10)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/spotify/save-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "saved" })))
        .mount(server)
        .await;
}

async fn mount_media(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/recommendation/search-spotify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "found": true,
            "spotify_id": "sp123",
            "album_image": "https://img/cover.jpg"
        })))
        .mount(server)
        .await;
}

async fn find_songs(server: &MockServer, identity: FakeIdentity, dir: &TempDir) -> FindSongs {
    let history = SongHistory::open(StateManager::at(dir.path().join("previous_songs.json"))).await;
    FindSongs::new(Arc::new(identity), BackendClient::new(server.uri()), history)
}

async fn request_bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == endpoint)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_missing_session_skips_history_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tracks_json(1)))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedOut, &dir).await;

    let result = flow.load(TimeRange::MediumTerm).await;

    assert!(matches!(result, Err(CoachError::AuthRequired)));
    assert_eq!(flow.store().error(), Some("Not authenticated - please log in"));
}

#[tokio::test]
async fn test_identity_failure_shows_session_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::Broken, &dir).await;

    let result = flow.load(TimeRange::ShortTerm).await;

    assert!(matches!(result, Err(CoachError::SessionError(_))));
    assert_eq!(flow.store().error(), Some("Session error - please log in again"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_load_fills_both_lists_and_saves_stats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-tracks"))
        .and(query_param("limit", "10"))
        .and(query_param("time_range", "medium_term"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tracks_json(10)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-artists"))
        .and(query_param("limit", "10"))
        .and(query_param("time_range", "medium_term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(artists_json(10)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/spotify/save-stats"))
        .and(query_param("time_range", "medium_term"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;

    flow.load(TimeRange::MediumTerm).await.unwrap();
    flow.settle().await;

    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
    assert_eq!(flow.store().tracks().len(), 10);
    assert_eq!(flow.store().artists().len(), 10);
    assert!(flow.store().can_generate());
}

#[tokio::test]
async fn test_failed_stats_snapshot_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/spotify/save-stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_history(&server).await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;

    assert!(flow.load(TimeRange::LongTerm).await.is_ok());
    flow.settle().await;

    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
}

#[tokio::test]
async fn test_one_failed_history_request_updates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tracks_json(10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spotify/top-artists"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/spotify/save-stats"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;

    let result = flow.load(TimeRange::MediumTerm).await;

    assert!(matches!(result, Err(CoachError::FetchFailed(_))));
    assert!(flow.store().tracks().is_empty());
    assert!(flow.store().artists().is_empty());
    assert_eq!(
        flow.store().error(),
        Some("Failed to fetch Spotify data. Make sure Spotify is connected.")
    );
}

#[tokio::test]
async fn test_generate_is_a_no_op_without_tracks() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;

    let result = flow.generate(None, None).await.unwrap();

    assert!(result.is_none());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_song_is_logged_even_when_media_lookup_fails() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Wonderwall", 2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/search-spotify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("previous_songs.json");
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    let song = flow.generate(None, None).await.unwrap().cloned().unwrap();

    assert_eq!(song.name, "Wonderwall");
    assert_eq!(song.difficulty.value(), 2);
    assert!(song.spotify_id.is_none());
    assert_eq!(flow.history().entries(), ["Wonderwall by Oasis"]);

    let stored: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(log_path).unwrap()).unwrap();
    assert_eq!(stored, vec!["Wonderwall by Oasis".to_string()]);
}

#[tokio::test]
async fn test_generate_sends_history_and_applies_media() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Creep", 3)))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("previous_songs.json"),
        r#"["Wonderwall by Oasis"]"#,
    )
    .unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    let song = flow.generate(None, None).await.unwrap().cloned().unwrap();

    assert_eq!(song.spotify_id.as_deref(), Some("sp123"));
    assert_eq!(song.artist_image.as_deref(), Some("https://img/cover.jpg"));

    let bodies = request_bodies(&server, "/api/recommendation/generate-song").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["previous_songs"], json!(["Wonderwall by Oasis"]));
    assert_eq!(bodies[0]["top_tracks"].as_array().unwrap().len(), 10);
    assert_eq!(bodies[0]["top_artists"].as_array().unwrap().len(), 10);
    let first = bodies[0]["current_difficulty"].as_i64().unwrap();
    assert!((1..=5).contains(&first));
    assert!(bodies[0]["adjust_difficulty"].is_null());

    assert_eq!(
        flow.history().entries(),
        ["Wonderwall by Oasis", "Creep by Oasis"]
    );
}

#[tokio::test]
async fn test_harder_request_sends_displayed_difficulty() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Wonderwall", 3)))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    flow.generate(None, None).await.unwrap();
    flow.generate(Some(DifficultyAdjustment::Up), None)
        .await
        .unwrap();

    let bodies = request_bodies(&server, "/api/recommendation/generate-song").await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1]["current_difficulty"], json!(3));
    assert_eq!(bodies[1]["adjust_difficulty"], json!("up"));
    assert_eq!(bodies[1]["previous_songs"], json!(["Wonderwall by Oasis"]));
}

#[tokio::test]
async fn test_harder_request_refused_at_maximum() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Eruption", 5)))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();
    flow.generate(None, None).await.unwrap();

    let result = flow.generate(Some(DifficultyAdjustment::Up), None).await;

    assert!(matches!(
        result,
        Err(CoachError::DifficultyOutOfRange { current: 5, .. })
    ));
    assert_eq!(flow.store().recommended().unwrap().name, "Eruption");
}

#[tokio::test]
async fn test_similar_to_artist_sends_no_artist_name() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Live Forever", 2)))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    flow.select_artist(1).unwrap();
    flow.generate_from_selection().await.unwrap();

    let bodies = request_bodies(&server, "/api/recommendation/generate-similar").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["type"], json!("artist"));
    assert_eq!(bodies[0]["name"], json!("Artist 2"));
    assert!(bodies[0]["artist_name"].is_null());
    // selection is cleared by generating
    assert!(flow.store().selected().is_none());
}

#[tokio::test]
async fn test_similar_to_track_sends_primary_artist() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Half the World Away", 2)))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    flow.select_track(0).unwrap();
    flow.generate_from_selection().await.unwrap();

    let bodies = request_bodies(&server, "/api/recommendation/generate-similar").await;
    assert_eq!(bodies[0]["type"], json!("track"));
    assert_eq!(bodies[0]["name"], json!("Track 1"));
    assert_eq!(bodies[0]["artist_name"], json!("Artist 1"));
}

#[tokio::test]
async fn test_out_of_range_difficulty_is_not_accepted() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Too Hard", 7)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/search-spotify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "found": false })))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    let result = flow.generate(None, None).await;

    assert!(matches!(result, Err(CoachError::GenerationFailed(_))));
    assert!(flow.store().recommended().is_none());
    assert!(flow.history().is_empty());
    assert_eq!(
        flow.store().generation_error(),
        Some("Failed to generate recommendation")
    );
    // the lists stay visible
    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
}

#[tokio::test]
async fn test_clear_history_persists_empty_list() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("previous_songs.json");
    std::fs::write(&log_path, r#"["A by B", "C by D"]"#).unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    assert_eq!(flow.history().len(), 2);
    flow.toggle_history();

    flow.clear_history().await.unwrap();

    assert!(flow.history().is_empty());
    assert!(!flow.store().show_history());
    let stored: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(log_path).unwrap()).unwrap();
    assert!(stored.is_empty());
}

async fn mount_history_for(server: &MockServer, range: &str, status: u16) {
    for endpoint in ["/api/spotify/top-tracks", "/api/spotify/top-artists"] {
        let body = if endpoint.ends_with("tracks") {
            tracks_json(3)
        } else {
            artists_json(2)
        };
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("time_range", range))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/api/spotify/save-stats"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_changing_time_range_recovers_from_failed_load() {
    let server = MockServer::start().await;
    mount_history_for(&server, "short_term", 500).await;
    mount_history_for(&server, "long_term", 200).await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;

    let failed = flow.load(TimeRange::ShortTerm).await;
    assert!(matches!(failed, Err(CoachError::FetchFailed(_))));
    assert!(flow.store().error().is_some());

    flow.load(TimeRange::LongTerm).await.unwrap();
    flow.settle().await;

    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
    assert_eq!(flow.store().time_range(), TimeRange::LongTerm);
    assert_eq!(flow.store().tracks().len(), 3);
    assert_eq!(flow.store().artists().len(), 2);
    assert!(flow.store().can_generate());
}

#[tokio::test]
async fn test_session_accepts_only_time_range_after_error() {
    let server = MockServer::start().await;
    mount_history_for(&server, "short_term", 500).await;
    mount_history_for(&server, "long_term", 200).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Creep", 3)))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    let _ = flow.load(TimeRange::ShortTerm).await;

    assert!(dispatch(&mut flow, SongsCommand::Generate).await);
    assert!(dispatch(&mut flow, SongsCommand::SelectTrack(0)).await);
    assert!(flow.store().error().is_some());
    assert!(flow.store().selected().is_none());

    assert!(dispatch(&mut flow, SongsCommand::TimeRange(TimeRange::LongTerm)).await);
    flow.settle().await;
    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
    assert_eq!(flow.store().tracks().len(), 3);

    assert!(!dispatch(&mut flow, SongsCommand::Quit).await);
}

#[tokio::test]
async fn test_adjust_without_displayed_song_is_not_ready() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Creep", 3)))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();

    let result = flow.generate(Some(DifficultyAdjustment::Up), None).await;

    assert!(matches!(result, Err(CoachError::NotReady(_))));
    assert!(!flow.store().is_generating());
    assert!(flow.history().is_empty());
}

#[tokio::test]
async fn test_failed_generation_keeps_displayed_song() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    mount_media(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendation_json("Wonderwall", 2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/recommendation/generate-song"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut flow = find_songs(&server, FakeIdentity::LoggedIn, &dir).await;
    flow.load(TimeRange::MediumTerm).await.unwrap();
    flow.generate(None, None).await.unwrap();

    let result = flow.generate(None, None).await;

    assert!(matches!(result, Err(CoachError::GenerationFailed(_))));
    let shown = flow.store().recommended().unwrap();
    assert_eq!(shown.name, "Wonderwall");
    assert_eq!(shown.difficulty.value(), 2);
    assert_eq!(flow.history().entries(), ["Wonderwall by Oasis"]);
    assert!(!flow.store().is_generating());
    assert_eq!(
        flow.store().generation_error(),
        Some("Failed to generate recommendation")
    );
    assert_eq!(flow.store().phase(), &ViewPhase::Ready);
}
