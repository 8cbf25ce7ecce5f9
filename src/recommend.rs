//! # Recommendation Flow
//!
//! Orchestrates the Find Songs screen:
//!
//! ```text
//! Session Guard ─→ Listening-History Fetcher (top tracks ∥ top artists)
//!                        │
//!                        └─→ save-stats (background, log only)
//!
//! (on demand) Recommendation Requester ─→ song log append ─→ Media Resolver
//!                        │
//!                        └─→ FindSongsStore update
//! ```
//!
//! Every backend call first goes through the session guard. Nothing is
//! retried. View-level failures (no session, history fetch) put the store in
//! its error phase; generation failures keep the previous recommendation.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::{
    backend::BackendClient,
    error::CoachError,
    identity::IdentityProvider,
    management::SongHistory,
    store::FindSongsStore,
    types::{
        Artist, Difficulty, DifficultyAdjustment, GenerateSimilarRequest, GenerateSongRequest,
        MediaMatch, Recommendation, RecommendedSong, SimilarSeed, TOP_ITEMS_LIMIT, TimeRange,
        Track,
    },
};

pub struct FindSongs {
    identity: Arc<dyn IdentityProvider>,
    backend: BackendClient,
    store: FindSongsStore,
    history: SongHistory,
    limit: u32,
    background: Vec<JoinHandle<()>>,
}

impl FindSongs {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        backend: BackendClient,
        history: SongHistory,
    ) -> Self {
        Self {
            identity,
            backend,
            store: FindSongsStore::new(),
            history,
            limit: TOP_ITEMS_LIMIT,
            background: Vec::new(),
        }
    }

    pub fn store(&self) -> &FindSongsStore {
        &self.store
    }

    pub fn history(&self) -> &SongHistory {
        &self.history
    }

    /// Returns the current access token.
    ///
    /// Fails with [`CoachError::SessionError`] when the identity service
    /// errors and with [`CoachError::AuthRequired`] when there is no session.
    pub async fn session_token(&self) -> Result<String, CoachError> {
        session_token(self.identity.as_ref()).await
    }

    /// Loads listening history for `time_range` into the store.
    ///
    /// Both lists are replaced together, and only when both requests succeed.
    /// A successful load also schedules a stats snapshot on the backend.
    pub async fn load(&mut self, time_range: TimeRange) -> Result<(), CoachError> {
        let ticket = self.store.begin_fetch(time_range);

        let token = match self.session_token().await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "session guard rejected history fetch");
                self.store.fail_fetch(ticket, e.user_message());
                return Err(e);
            }
        };

        match fetch_listening_history(&self.backend, &token, self.limit, time_range).await {
            Ok((tracks, artists)) => {
                if !self.store.complete_fetch(ticket, tracks, artists) {
                    debug!(%time_range, "discarding stale listening history");
                    return Ok(());
                }
                self.spawn_save_stats(token, time_range);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, %time_range, "listening history fetch failed");
                self.store.fail_fetch(ticket, e.user_message());
                Err(e)
            }
        }
    }

    fn spawn_save_stats(&mut self, token: String, time_range: TimeRange) {
        self.background.retain(|h| !h.is_finished());

        let backend = self.backend.clone();
        self.background.push(tokio::spawn(async move {
            match backend.save_stats(&token, time_range).await {
                Ok(()) => debug!(%time_range, "Spotify stats saved"),
                Err(e) => warn!(error = %e, %time_range, "failed to save Spotify stats"),
            }
        }));
    }

    /// Waits for background calls (stats snapshots) to finish.
    pub async fn settle(&mut self) {
        for handle in self.background.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "background task failed");
            }
        }
    }

    /// Generates one new recommendation.
    ///
    /// Returns `Ok(None)` without doing anything while no tracks are loaded.
    /// A difficulty nudge is refused with [`CoachError::NotReady`] while no
    /// song is displayed and with [`CoachError::DifficultyOutOfRange`] when
    /// the displayed song does not allow it.
    pub async fn generate(
        &mut self,
        adjust: Option<DifficultyAdjustment>,
        seed: Option<SimilarSeed>,
    ) -> Result<Option<&RecommendedSong>, CoachError> {
        if self.store.tracks().is_empty() {
            return Ok(None);
        }

        if let Some(direction) = adjust {
            let Some(current) = self.store.current_difficulty() else {
                return Err(CoachError::NotReady("no song is displayed".to_string()));
            };
            if !self.store.can_adjust(direction) {
                return Err(CoachError::DifficultyOutOfRange {
                    current: current.value(),
                    direction: direction.to_string(),
                });
            }
        }

        self.store.begin_generation()?;
        let outcome = self.request_recommendation(adjust, seed.as_ref()).await;

        match outcome {
            Ok(song) => {
                self.store.finish_generation(Ok(song));
                Ok(self.store.recommended())
            }
            Err(e) => {
                error!(error = %e, "recommendation failed");
                self.store.finish_generation(Err(e.user_message()));
                if e.is_auth_error() {
                    self.store.fail_session(e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Generates a recommendation similar to the selected track or artist.
    pub async fn generate_from_selection(
        &mut self,
    ) -> Result<Option<&RecommendedSong>, CoachError> {
        let seed = self
            .store
            .selected()
            .map(|item| item.to_seed())
            .ok_or_else(|| CoachError::InvalidInput("nothing is selected".to_string()))?;
        self.generate(None, Some(seed)).await
    }

    async fn request_recommendation(
        &mut self,
        adjust: Option<DifficultyAdjustment>,
        seed: Option<&SimilarSeed>,
    ) -> Result<RecommendedSong, CoachError> {
        let token = self.session_token().await?;
        let current_difficulty = self
            .store
            .current_difficulty()
            .unwrap_or_else(Difficulty::random);

        let recommendation = {
            let previous_songs = self.history.entries();
            let result = match seed {
                Some(seed) => {
                    let body = GenerateSimilarRequest {
                        kind: seed.kind(),
                        name: seed.name(),
                        artist_name: seed.artist_name(),
                        current_difficulty,
                        previous_songs,
                    };
                    self.backend.generate_similar(&token, &body).await
                }
                None => {
                    let body = GenerateSongRequest {
                        top_tracks: self.store.tracks(),
                        top_artists: self.store.artists(),
                        current_difficulty,
                        adjust_difficulty: adjust,
                        previous_songs,
                    };
                    self.backend.generate_song(&token, &body).await
                }
            };
            result.map_err(|e| CoachError::GenerationFailed(e.to_string()))?
        };

        let difficulty = accept(&recommendation)?;

        // Counted as seen before media resolution, which may still fail.
        if let Err(e) = self.history.record(recommendation.history_entry()).await {
            warn!(error = %e, "failed to persist song history");
        }

        let song = RecommendedSong::new(recommendation, difficulty);
        Ok(match self.resolve_media(&token, &song.name, &song.artist).await {
            Some(media) => song.with_media(media),
            None => song,
        })
    }

    /// Best-effort lookup of a playable track; failures are only logged.
    async fn resolve_media(&self, token: &str, name: &str, artist: &str) -> Option<MediaMatch> {
        match self.backend.search_spotify(token, name, artist).await {
            Ok(media) => {
                debug!(found = media.found, spotify_id = ?media.spotify_id, "media resolved");
                Some(media)
            }
            Err(e) => {
                warn!(error = %e, song = name, "media resolution failed");
                None
            }
        }
    }

    pub fn select_track(&mut self, index: usize) -> Result<(), CoachError> {
        self.store.select_track(index)
    }

    pub fn select_artist(&mut self, index: usize) -> Result<(), CoachError> {
        self.store.select_artist(index)
    }

    pub fn toggle_history(&mut self) -> bool {
        self.store.toggle_history()
    }

    /// Empties the song log, persists the empty log and closes the panel.
    pub async fn clear_history(&mut self) -> Result<(), CoachError> {
        self.history.clear().await?;
        self.store.hide_history();
        Ok(())
    }
}

pub async fn session_token(identity: &dyn IdentityProvider) -> Result<String, CoachError> {
    match identity.get_session().await {
        Ok(Some(session)) if !session.access_token.is_empty() => Ok(session.access_token),
        Ok(_) => Err(CoachError::AuthRequired),
        Err(e) if e.is_auth_error() => Err(e),
        Err(e) => Err(CoachError::SessionError(e.to_string())),
    }
}

/// Fetches top tracks and top artists concurrently; both must succeed.
pub async fn fetch_listening_history(
    backend: &BackendClient,
    token: &str,
    limit: u32,
    time_range: TimeRange,
) -> Result<(Vec<Track>, Vec<Artist>), CoachError> {
    tokio::try_join!(
        backend.top_tracks(token, limit, time_range),
        backend.top_artists(token, limit, time_range),
    )
    .map_err(|e| CoachError::FetchFailed(e.to_string()))
}

/// Checks that a recommendation is usable and returns its difficulty.
fn accept(recommendation: &Recommendation) -> Result<Difficulty, CoachError> {
    if recommendation.name.trim().is_empty() || recommendation.artist.trim().is_empty() {
        return Err(CoachError::GenerationFailed(
            "recommendation is missing a song name or artist".to_string(),
        ));
    }
    Difficulty::new(recommendation.difficulty).map_err(|_| {
        CoachError::GenerationFailed(format!(
            "recommendation difficulty {} is outside 1..=5",
            recommendation.difficulty
        ))
    })
}
