//! GuitarCoach CLI Library
//!
//! Client side of GuitarCoach: finds songs to learn from a user's Spotify
//! listening history, generates practice plans and walks new users through
//! the onboarding questionnaire. All heavy lifting (Spotify tokens,
//! recommendation model) happens on the GuitarCoach backend; the identity
//! service keeps accounts and profiles.
//!
//! # Modules
//!
//! - `api` - Endpoints of the local Spotify-link callback server
//! - `backend` - HTTP client for the GuitarCoach backend
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type and user-facing messages
//! - `identity` - Identity service (sessions, profiles)
//! - `management` - Locally persisted session and song history
//! - `questionnaire` - Onboarding questionnaire
//! - `recommend` - Find Songs recommendation flow
//! - `schedule` - Weekly practice schedule
//! - `server` - Local HTTP server for the Spotify-link callback
//! - `store` - Find Songs view state
//! - `types` - Data structures and type definitions
//! - `utils` - Prompts, spinners and parsers
//! - `view` - Text rendering of the Find Songs screen

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod management;
pub mod questionnaire;
pub mod recommend;
pub mod schedule;
pub mod server;
pub mod store;
pub mod types;
pub mod utils;
pub mod view;

/// Boxed-error result for command-level plumbing mixing I/O and client errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits with code 1.
///
/// Only for failures a command cannot recover from.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
