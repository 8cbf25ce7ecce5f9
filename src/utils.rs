use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::TimeRange;

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Prints `label` and reads one trimmed line from stdin. `None` on EOF.
pub fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn parse_time_range(s: &str) -> Result<TimeRange, String> {
    s.parse()
}

/// One-based list index as typed by the user, converted to zero-based.
pub fn parse_index(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("'{}' is not a number from 1 up", s.trim())),
    }
}

/// Validates sign-up input the way the account form does.
///
/// Returns the trimmed username.
pub fn validate_signup(username: &str, password: &str) -> Result<String, String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required.".to_string());
    }
    if username.chars().count() < 6 {
        return Err("Username must be at least 6 characters.".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters.".to_string());
    }
    Ok(username.to_string())
}
