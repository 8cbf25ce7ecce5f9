//! # API Module
//!
//! Endpoints of the local server that runs while a Spotify account is being
//! linked. The backend finishes the Spotify authorization and redirects the
//! browser to `/profile` here, carrying the outcome in the query string.
//!
//! - [`spotify_callback`] records the outcome and answers with a small page.
//! - [`health`] reports that the server is up.

mod callback;
mod health;

pub use callback::{link_outcome, spotify_callback};
pub use health::health;
