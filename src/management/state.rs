use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config;

pub const STATE_PREVIOUS_SONGS: &str = "previous_songs";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file I/O failed: {0}")]
    IoError(#[from] std::io::Error),
    #[error("state file is not a JSON string array: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// A string array persisted as JSON under a fixed key.
///
/// This is the client's local storage: each key maps to one file
/// `<data dir>/state/<key>.json`.
#[derive(Debug, Clone)]
pub struct StateManager {
    path: PathBuf,
    state: Vec<String>,
}

impl StateManager {
    pub fn new(state_type: &str) -> Self {
        let mut path = config::data_dir();
        path.push(format!("state/{state}.json", state = state_type));
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Vec::new(),
        }
    }

    /// Reads the stored array. A missing file yields an empty state.
    pub async fn load(mut self) -> Result<Self, StateError> {
        let json = match async_fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.state.clear();
                return Ok(self);
            }
            Err(e) => return Err(StateError::IoError(e)),
        };
        self.state = serde_json::from_str(&json)?;
        Ok(self)
    }

    pub async fn persist(&self) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.state)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn add(&mut self, item: String) {
        self.state.push(item);
    }

    pub fn get_state(&self) -> &[String] {
        &self.state
    }

    pub fn has(&self, item: &str) -> bool {
        self.state.iter().any(|s| s == item)
    }

    /// Empties the state and writes the empty array back.
    pub async fn clear(&mut self) -> Result<(), StateError> {
        self.state.clear();
        self.persist().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
