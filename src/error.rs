//! Error types shared by the GuitarCoach client.
//!
//! Every failure in the recommendation flow maps onto one [`CoachError`]
//! variant. The variants that reach the user carry a fixed display string
//! (see [`CoachError::user_message`]); everything else is reported through
//! `tracing` only.

use thiserror::Error;

/// Result alias used by the library layers.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Message shown when no session token is available.
pub const MSG_AUTH_REQUIRED: &str = "Not authenticated - please log in";
/// Message shown when the identity service reports an error.
pub const MSG_SESSION_ERROR: &str = "Session error - please log in again";
/// Message shown when the listening-history pair could not be loaded.
pub const MSG_FETCH_FAILED: &str = "Failed to fetch Spotify data. Make sure Spotify is connected.";
/// Message shown when a recommendation could not be generated.
pub const MSG_GENERATION_FAILED: &str = "Failed to generate recommendation";

#[derive(Debug, Error)]
pub enum CoachError {
    /// No access token is present.
    #[error("no active session")]
    AuthRequired,

    /// The identity service reported an error while reading the session.
    #[error("session error: {0}")]
    SessionError(String),

    /// Either listening-history request did not succeed.
    #[error("listening history fetch failed: {0}")]
    FetchFailed(String),

    /// The recommendation call threw or returned unusable data.
    #[error("recommendation generation failed: {0}")]
    GenerationFailed(String),

    /// A difficulty nudge was requested that the current difficulty does not allow.
    #[error("difficulty {current} cannot be adjusted {direction}")]
    DifficultyOutOfRange { current: u8, direction: String },

    /// A generation was requested while the view is not in a state that allows it.
    #[error("cannot generate right now: {0}")]
    NotReady(String),

    /// Identity service call failed (sign in, sign up, profile access).
    #[error("identity service error: {0}")]
    Identity(String),

    /// Backend returned a non-success status.
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("local state error: {0}")]
    State(#[from] crate::management::StateError),
}

impl CoachError {
    /// Text displayed to the user for this error.
    ///
    /// Auth, session, fetch and generation failures use the fixed strings of the
    /// Find Songs view; all other errors fall back to their `Display` output.
    pub fn user_message(&self) -> String {
        match self {
            CoachError::AuthRequired => MSG_AUTH_REQUIRED.to_string(),
            CoachError::SessionError(_) => MSG_SESSION_ERROR.to_string(),
            CoachError::FetchFailed(_) => MSG_FETCH_FAILED.to_string(),
            CoachError::GenerationFailed(_) => MSG_GENERATION_FAILED.to_string(),
            other => other.to_string(),
        }
    }

    /// True for errors that are fixed by logging in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, CoachError::AuthRequired | CoachError::SessionError(_))
    }
}
