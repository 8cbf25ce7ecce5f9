//! # CLI Module
//!
//! One function per subcommand. Each command builds the clients it needs from
//! the configuration, talks to the user through the `info!` / `success!` /
//! `warning!` / `error!` macros and spinners, and exits through `error!` on
//! failures it cannot recover from.
//!
//! ```text
//! CLI Layer (user interaction)
//!     ↓
//! recommend / store / questionnaire (flow and view state)
//!     ↓
//! backend / identity (HTTP clients)   management (local files)
//! ```

mod account;
mod connect;
mod dashboard;
mod health;
mod plan;
mod questionnaire;
mod songs;

pub use account::{login, logout, profile, signup};
pub use connect::connect_spotify;
pub use dashboard::{dashboard, schedule};
pub use health::health;
pub use plan::{PlanOptions, plan};
pub use questionnaire::questionnaire;
pub use songs::{SongsCommand, clear_history, dispatch, show_history, songs};

use crate::{error, identity::SupabaseIdentity, recommend};

fn identity_client() -> SupabaseIdentity {
    match SupabaseIdentity::from_config() {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    }
}

/// Access token of the current session; exits with the auth message otherwise.
async fn access_token(identity: &SupabaseIdentity) -> String {
    match recommend::session_token(identity).await {
        Ok(token) => token,
        Err(e) => error!("{}", e.user_message()),
    }
}
