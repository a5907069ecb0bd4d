//! Identity snapshot and the auth state pair observed by route guards.
//!
//! DESIGN
//! ======
//! A `Session` is an immutable snapshot: every update replaces it wholesale
//! inside a fresh `AuthState`, nothing patches it in place.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Literal tag that unlocks admin-only content.
pub const ADMIN_ROLE_TAG: &str = "admin";

/// Authorization role attached to a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Map a raw role tag to a role. Only the exact `"admin"` tag is admin;
    /// anything else, including an absent tag, is a plain user.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(ADMIN_ROLE_TAG) => Self::Admin,
            _ => Self::User,
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

/// Authenticated identity returned by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity-provider user id.
    pub user_id: Uuid,
    pub email: String,
    /// Display name from the signup profile, if set.
    pub name: Option<String>,
    pub profession: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Session {
    /// Session with an email and default role; profile fields empty.
    #[must_use]
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self { user_id, email: email.into(), name: None, profession: None, bio: None, role: Role::User }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown in the navigation bar: the profile name, else the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.email)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authentication state tracking the current session and loading status.
///
/// Exactly one value is live at a time, held by [`crate::store::SessionStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl AuthState {
    /// Startup state: no session yet, bootstrap unresolved.
    #[must_use]
    pub fn bootstrapping() -> Self {
        Self { session: None, loading: true }
    }

    /// Settled state carrying the given session (or none).
    #[must_use]
    pub fn resolved(session: Option<Session>) -> Self {
        Self { session, loading: false }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self::resolved(None)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// True only for a settled session whose role is exactly admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::bootstrapping()
    }
}

/// Email + password pair passed to a sign-in call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Account creation request; profile fields are attached as provider metadata.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profession: Option<String>,
    pub bio: Option<String>,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("profession", &self.profession)
            .field("bio", &self.bio)
            .finish()
    }
}
