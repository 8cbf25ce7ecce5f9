use reqwest::Url;
use serde::de::DeserializeOwned;

use super::{BackendClient, ensure_success};
use crate::{
    error::CoachError,
    types::{Artist, ItemsResponse, TimeRange, Track},
};

impl BackendClient {
    /// The user's top tracks for `time_range`, at most `limit` items.
    pub async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Track>, CoachError> {
        self.top_items("/api/spotify/top-tracks", token, limit, time_range)
            .await
    }

    /// The user's top artists for `time_range`, at most `limit` items.
    pub async fn top_artists(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Artist>, CoachError> {
        self.top_items("/api/spotify/top-artists", token, limit, time_range)
            .await
    }

    async fn top_items<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<T>, CoachError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .query(&[
                ("limit", limit.to_string()),
                ("time_range", time_range.as_str().to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let res = response.json::<ItemsResponse<T>>().await?;
        Ok(res.items)
    }

    /// Asks the backend to store a snapshot of the user's listening stats.
    pub async fn save_stats(&self, token: &str, time_range: TimeRange) -> Result<(), CoachError> {
        let response = self
            .http
            .post(self.url("/api/spotify/save-stats"))
            .bearer_auth(token)
            .query(&[("time_range", time_range.as_str())])
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Browser URL that starts linking the user's Spotify account.
    ///
    /// The backend takes the identity token from the query string here since
    /// a browser navigation cannot carry an `Authorization` header.
    pub fn spotify_login_url(&self, token: &str) -> Result<String, CoachError> {
        let url = Url::parse_with_params(
            &self.url("/api/spotify/login"),
            &[("token", token)],
        )
        .map_err(|e| CoachError::Config(format!("invalid backend URL: {}", e)))?;
        Ok(url.to_string())
    }
}
