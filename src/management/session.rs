use std::path::PathBuf;

use chrono::Utc;

use crate::{config, error::CoachError, types::Session};

/// Seconds before expiry at which a session is treated as expired.
const EXPIRY_BUFFER_SECS: u64 = 240;

impl Session {
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        self.is_expired_at(now)
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_BUFFER_SECS >= self.obtained_at + self.expires_in
    }
}

/// Local persistence for the identity-service session.
#[derive(Debug, Clone)]
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    pub fn new() -> Self {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the stored session, `None` when nobody is logged in.
    pub async fn load(&self) -> Result<Option<Session>, CoachError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoachError::SessionError(e.to_string())),
        };
        let session: Session = serde_json::from_str(&content)
            .map_err(|e| CoachError::SessionError(format!("corrupt session file: {}", e)))?;
        Ok(Some(session))
    }

    pub async fn persist(&self, session: &Session) -> Result<(), CoachError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(session)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), CoachError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoachError::Io(e)),
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
