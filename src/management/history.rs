use tracing::warn;

use super::state::{STATE_PREVIOUS_SONGS, StateError, StateManager};

/// Songs already recommended to the user, as `"<name> by <artist>"` entries.
///
/// Sent with every generation request so the backend can avoid repeats.
/// Survives restarts; only [`SongHistory::clear`] removes entries.
#[derive(Debug, Clone)]
pub struct SongHistory {
    state: StateManager,
}

impl SongHistory {
    /// Opens the history stored in the local data directory.
    pub async fn open_default() -> Self {
        Self::open(StateManager::new(STATE_PREVIOUS_SONGS)).await
    }

    /// Opens the history backed by `state`. An unreadable file is logged and
    /// replaced by an empty history on the next write.
    pub async fn open(state: StateManager) -> Self {
        let path = state.path().to_path_buf();
        match state.load().await {
            Ok(state) => Self { state },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable song history");
                Self {
                    state: StateManager::at(path),
                }
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        self.state.get_state()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.state.has(entry)
    }

    /// Appends `entry` and writes the log to disk.
    ///
    /// The in-memory append always happens; only the write can fail.
    pub async fn record(&mut self, entry: String) -> Result<(), StateError> {
        self.state.add(entry);
        self.state.persist().await
    }

    pub async fn clear(&mut self) -> Result<(), StateError> {
        self.state.clear().await
    }
}
