mod history;
mod session;
mod state;

pub use history::SongHistory;
pub use session::SessionManager;
pub use state::STATE_PREVIOUS_SONGS;
pub use state::StateError;
pub use state::StateManager;
