//! Contract required from the external identity provider.
//!
//! The gateway is generic over this trait so hosted backends (see
//! [`crate::gotrue`]) and in-process fakes plug in the same way.

use crate::error::ProviderError;
use crate::listeners::Subscription;
use crate::session::{Credentials, Session, SignupRequest};

/// Why the provider's session changed out of band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEventKind {
    SignedIn,
    SignedOut,
    UserUpdated,
}

/// Provider-delivered session change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session: Option<Session>,
}

impl SessionEvent {
    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self { kind: SessionEventKind::SignedIn, session: Some(session) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { kind: SessionEventKind::SignedOut, session: None }
    }

    #[must_use]
    pub fn user_updated(session: Session) -> Self {
        Self { kind: SessionEventKind::UserUpdated, session: Some(session) }
    }
}

/// Result of a successful sign-up call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupOutcome {
    /// The created account.
    pub user: Session,
    /// False when the account must be confirmed before a session is issued.
    pub session_issued: bool,
}

/// Callback registered with [`IdentityProvider::on_session_change`].
pub type SessionListener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Async identity-provider operations consumed by the gateway.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return the session the provider already holds, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider cannot be reached.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] carrying the provider's message on rejection.
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, ProviderError>;

    /// Create an account, attaching the request's profile fields as metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] carrying the provider's message on rejection.
    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupOutcome, ProviderError>;

    /// End the provider-side session.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if revocation fails; callers treat the
    /// local session as ended regardless.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Register for out-of-band session changes. The listener stays live
    /// until the returned handle is released.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}
