use serde::Serialize;

use super::{BackendClient, ensure_success};
use crate::{
    error::CoachError,
    types::{GenerateSimilarRequest, GenerateSongRequest, MediaMatch, Recommendation},
};

impl BackendClient {
    /// Generates a recommendation from the user's full listening history.
    pub async fn generate_song(
        &self,
        token: &str,
        body: &GenerateSongRequest<'_>,
    ) -> Result<Recommendation, CoachError> {
        self.post_for_recommendation("/api/recommendation/generate-song", token, body)
            .await
    }

    /// Generates a recommendation similar to one track or artist.
    pub async fn generate_similar(
        &self,
        token: &str,
        body: &GenerateSimilarRequest<'_>,
    ) -> Result<Recommendation, CoachError> {
        self.post_for_recommendation("/api/recommendation/generate-similar", token, body)
            .await
    }

    async fn post_for_recommendation<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<Recommendation, CoachError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<Recommendation>().await?)
    }

    /// Looks up a playable Spotify track and cover image for a song.
    pub async fn search_spotify(
        &self,
        token: &str,
        song_name: &str,
        artist_name: &str,
    ) -> Result<MediaMatch, CoachError> {
        let response = self
            .http
            .post(self.url("/api/recommendation/search-spotify"))
            .bearer_auth(token)
            .query(&[("song_name", song_name), ("artist_name", artist_name)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<MediaMatch>().await?)
    }
}
