//! Configuration management for the GuitarCoach client.
//!
//! Values are read from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::CoachError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5173";

/// Root of everything the client stores locally.
///
/// - Linux: `~/.local/share/guitarcoach`
/// - macOS: `~/Library/Application Support/guitarcoach`
/// - Windows: `%LOCALAPPDATA%/guitarcoach`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("guitarcoach");
    path
}

/// Loads environment variables from `guitarcoach/.env` in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error since every value can also come from the process environment.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &str) -> Result<String, CoachError> {
    optional(key).ok_or_else(|| CoachError::Config(format!("{} must be set", key)))
}

/// Base URL of the GuitarCoach backend, without a trailing slash.
pub fn api_url() -> String {
    optional("GUITARCOACH_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Base URL of the identity service (e.g. `https://xyz.supabase.co`).
pub fn supabase_url() -> Result<String, CoachError> {
    required("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string())
}

/// Public API key sent with every identity-service request.
pub fn supabase_anon_key() -> Result<String, CoachError> {
    required("SUPABASE_ANON_KEY")
}

/// Address the local server binds to while linking a Spotify account.
///
/// The backend's `FRONTEND_URL` must point at this address so that its
/// redirect after authorization lands here.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}
