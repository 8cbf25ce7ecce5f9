use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::IdentityProvider;
use crate::{
    config,
    error::CoachError,
    management::SessionManager,
    types::{Profile, ProfileUpdate, Session, User},
};

const PROFILE_COLUMNS: &str = "id,username,spotify_access_token,has_completed_questionnaire";

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    #[serde(default)]
    user: Option<User>,
}

impl AuthResponse {
    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
            user: self.user,
        }
    }
}

/// What a sign-up produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is active and a session was stored.
    SignedIn(Session),
    /// The account exists but the email address must be confirmed first.
    ConfirmationPending,
}

#[derive(Debug, Clone)]
pub struct SupabaseIdentity {
    http: Client,
    base_url: String,
    anon_key: String,
    sessions: SessionManager,
}

impl SupabaseIdentity {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        sessions: SessionManager,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            sessions,
        }
    }

    /// Identity client for `SUPABASE_URL` / `SUPABASE_ANON_KEY`, storing its
    /// session in the local data directory.
    pub fn from_config() -> Result<Self, CoachError> {
        Ok(Self::new(
            config::supabase_url()?,
            config::supabase_anon_key()?,
            SessionManager::new(),
        ))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.anon_key)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoachError> {
        let response = self
            .request(
                self.http
                    .post(format!("{}/auth/v1/token", self.base_url))
                    .query(&[("grant_type", "password")]),
            )
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let auth = identity_json::<AuthResponse>(response).await?;
        let session = auth.into_session();
        self.sessions.persist(&session).await?;
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, CoachError> {
        let response = self
            .request(self.http.post(format!("{}/auth/v1/signup", self.base_url)))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = identity_json::<Value>(response).await?;
        if body.get("access_token").is_some() {
            let auth: AuthResponse = serde_json::from_value(body)?;
            let session = auth.into_session();
            self.sessions.persist(&session).await?;
            return Ok(SignUpOutcome::SignedIn(session));
        }

        Ok(SignUpOutcome::ConfirmationPending)
    }

    /// Revokes the session remotely (best effort) and forgets it locally.
    pub async fn sign_out(&self) -> Result<(), CoachError> {
        if let Ok(Some(session)) = self.sessions.load().await {
            let result = self
                .request(self.http.post(format!("{}/auth/v1/logout", self.base_url)))
                .bearer_auth(&session.access_token)
                .send()
                .await;
            if let Err(e) = result {
                warn!(error = %e, "remote sign out failed");
            }
        }
        self.sessions.clear().await
    }

    async fn refresh(&self, session: &Session) -> Result<Session, CoachError> {
        debug!("refreshing identity session");
        let response = self
            .request(
                self.http
                    .post(format!("{}/auth/v1/token", self.base_url))
                    .query(&[("grant_type", "refresh_token")]),
            )
            .json(&json!({ "refresh_token": session.refresh_token }))
            .send()
            .await
            .map_err(|e| CoachError::SessionError(e.to_string()))?;

        let auth = identity_json::<AuthResponse>(response)
            .await
            .map_err(|e| CoachError::SessionError(e.to_string()))?;

        let mut refreshed = auth.into_session();
        if refreshed.user.is_none() {
            refreshed.user = session.user.clone();
        }
        self.sessions.persist(&refreshed).await?;
        Ok(refreshed)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn get_session(&self) -> Result<Option<Session>, CoachError> {
        let Some(session) = self.sessions.load().await? else {
            return Ok(None);
        };

        if session.is_expired() {
            return self.refresh(&session).await.map(Some);
        }
        Ok(Some(session))
    }

    async fn get_user(&self) -> Result<Option<User>, CoachError> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };

        let response = self
            .request(self.http.get(format!("{}/auth/v1/user", self.base_url)))
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(identity_json::<User>(response).await?))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, CoachError> {
        let session = self.get_session().await?.ok_or(CoachError::AuthRequired)?;

        let response = self
            .request(self.http.get(format!("{}/rest/v1/profiles", self.base_url)))
            .bearer_auth(&session.access_token)
            .query(&[
                ("id", format!("eq.{}", user_id)),
                ("select", PROFILE_COLUMNS.to_string()),
            ])
            .send()
            .await?;

        let rows = identity_json::<Vec<Profile>>(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), CoachError> {
        let session = self.get_session().await?.ok_or(CoachError::AuthRequired)?;

        let response = self
            .request(self.http.patch(format!("{}/rest/v1/profiles", self.base_url)))
            .bearer_auth(&session.access_token)
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", user_id))])
            .json(update)
            .send()
            .await?;

        identity_status(response).await
    }
}

async fn identity_status(response: Response) -> Result<(), CoachError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(CoachError::Identity(error_message(response).await))
}

async fn identity_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CoachError> {
    if !response.status().is_success() {
        return Err(CoachError::Identity(error_message(response).await));
    }
    Ok(response.json::<T>().await?)
}

/// Human readable message of an identity-service error body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(&body).ok();

    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", status, body).trim().to_string())
}
