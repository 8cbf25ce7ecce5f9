//! # Identity
//!
//! Access to the identity and profile-database service. The rest of the client
//! only depends on the [`IdentityProvider`] trait; [`SupabaseIdentity`] is the
//! implementation talking to a Supabase project over its REST endpoints.

mod supabase;

use async_trait::async_trait;

use crate::{
    error::CoachError,
    types::{Profile, ProfileUpdate, Session, User},
};

pub use supabase::{SignUpOutcome, SupabaseIdentity};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The current session, `None` when nobody is logged in.
    ///
    /// Errors mean the identity service itself failed (unreadable session,
    /// refresh rejected), not that the user is logged out.
    async fn get_session(&self) -> Result<Option<Session>, CoachError>;

    /// The user owning the current session.
    async fn get_user(&self) -> Result<Option<User>, CoachError>;

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, CoachError>;

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate)
    -> Result<(), CoachError>;
}

/// Resolves the current user or fails with [`CoachError::AuthRequired`].
pub async fn require_user(identity: &dyn IdentityProvider) -> Result<User, CoachError> {
    if identity.get_session().await?.is_none() {
        return Err(CoachError::AuthRequired);
    }
    identity.get_user().await?.ok_or(CoachError::AuthRequired)
}
