use super::identity_client;
use crate::{
    error,
    error::CoachError,
    identity::{IdentityProvider, SignUpOutcome, require_user},
    info, success,
    types::{ProfileUpdate, Session},
    utils, warning,
};

/// Reads a value given on the command line, or prompts for it.
fn value_or_prompt(value: Option<String>, label: &str) -> String {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        return value;
    }
    match utils::prompt(label) {
        Ok(Some(line)) if !line.is_empty() => line,
        Ok(_) => error!("{} is required.", label.trim_end_matches(": ")),
        Err(e) => error!("Cannot read input. Err: {}", e),
    }
}

pub async fn login(email: Option<String>, password: Option<String>) {
    let email = value_or_prompt(email, "Email: ");
    let password = value_or_prompt(password, "Password: ");

    let pb = utils::spinner("Logging in...");
    let result = identity_client().sign_in(&email, &password).await;
    pb.finish_and_clear();

    match result {
        Ok(session) => success!("Logged in as {}.", account_name(&session, &email)),
        Err(CoachError::Identity(message)) => error!("{}", message),
        Err(e) => error!("Login failed: {}", e),
    }
}

fn account_name<'a>(session: &'a Session, fallback: &'a str) -> &'a str {
    session
        .user
        .as_ref()
        .and_then(|u| u.email.as_deref())
        .unwrap_or(fallback)
}

pub async fn signup(username: Option<String>, email: Option<String>, password: Option<String>) {
    let username = value_or_prompt(username, "Username: ");
    let email = value_or_prompt(email, "Email: ");
    let password = value_or_prompt(password, "Password: ");

    let username = match utils::validate_signup(&username, &password) {
        Ok(username) => username,
        Err(message) => error!("{}", message),
    };

    let identity = identity_client();
    let pb = utils::spinner("Creating account...");
    let outcome = identity.sign_up(&email, &password).await;
    pb.finish_and_clear();

    let session = match outcome {
        Ok(SignUpOutcome::SignedIn(session)) => session,
        Ok(SignUpOutcome::ConfirmationPending) => {
            info!("Account created. Please check your email to confirm, then log in.");
            return;
        }
        Err(CoachError::Identity(message)) => error!("{}", message),
        Err(e) => error!("Sign up failed: {}", e),
    };

    let user_id = match session.user.as_ref() {
        Some(user) => user.id.clone(),
        None => match require_user(&identity).await {
            Ok(user) => user.id,
            Err(e) => error!("{}", e.user_message()),
        },
    };

    let update = ProfileUpdate {
        username: Some(username.clone()),
        ..Default::default()
    };
    if let Err(e) = identity.update_profile(&user_id, &update).await {
        tracing::error!(error = %e, "profile update after sign up failed");
        error!("{}", e);
    }

    success!("Account created. Welcome, {}!", username);
}

pub async fn logout() {
    match identity_client().sign_out().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Logout failed: {}", e),
    }
}

pub async fn profile() {
    let identity = identity_client();

    let user = match require_user(&identity).await {
        Ok(user) => user,
        Err(e) => error!("{}", e.user_message()),
    };

    let profile = match identity.fetch_profile(&user.id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            warning!("No profile found for this account.");
            return;
        }
        Err(e) => error!("Cannot load profile: {}", error_text(&e)),
    };

    info!("Username: {}", profile.username.as_deref().unwrap_or(""));
    if let Some(email) = user.email.as_deref() {
        info!("Email: {}", email);
    }
    info!(
        "Questionnaire: {}",
        if profile.has_completed_questionnaire.unwrap_or(false) {
            "completed"
        } else {
            "not completed (run guitarcoach questionnaire)"
        }
    );
    info!(
        "Spotify: {}",
        if profile.spotify_connected() {
            "connected"
        } else {
            "not connected (run guitarcoach connect-spotify)"
        }
    );
}

fn error_text(e: &CoachError) -> String {
    match e {
        CoachError::Identity(message) => message.clone(),
        other => other.user_message(),
    }
}
