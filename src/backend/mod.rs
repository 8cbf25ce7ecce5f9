//! # Backend Client
//!
//! HTTP client for the GuitarCoach backend. The backend owns everything that
//! needs secrets or a database: the Spotify tokens of each user, the
//! recommendation model, and the practice-plan generator. This client only
//! forwards the identity-service access token as a bearer token.
//!
//! ```text
//! Recommendation flow / CLI
//!          ↓
//! BackendClient
//!     ├── spotify         top tracks, top artists, stats snapshot
//!     ├── recommendation  generate-song, generate-similar, search-spotify
//!     └── practice_plan   practice-plan generator
//!          ↓
//! GuitarCoach backend (HTTP, JSON)
//! ```
//!
//! No call is retried and no timeout is configured; a failed call is reported
//! to the caller as a [`CoachError`].

pub mod practice_plan;
pub mod recommendation;
pub mod spotify;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::{config, error::CoachError, types::HealthStatus};

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client for the backend configured through `GUITARCOACH_API_URL`.
    pub fn from_config() -> Self {
        Self::new(config::api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthStatus, CoachError> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<HealthStatus>().await?)
    }
}

/// Turns a non-success response into [`CoachError::Backend`].
///
/// The message is the `detail` field of the error body when the backend sent
/// one, otherwise the raw body.
async fn ensure_success(response: Response) -> Result<Response, CoachError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    debug!(%url, status = status.as_u16(), %message, "backend returned an error");
    Err(CoachError::Backend {
        status: status.as_u16(),
        message,
    })
}
