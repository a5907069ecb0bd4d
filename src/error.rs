//! Auth error taxonomy.
//!
//! DESIGN
//! ======
//! The identity provider reports failures as free-form message strings.
//! `AuthError::classify` is the only place that inspects that text; every
//! caller above the gateway matches on [`AuthErrorKind`] instead.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Opaque failure reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Provider message fragments and the kind each one maps to, checked in order.
const MESSAGE_RULES: &[(&str, AuthErrorKind)] = &[
    ("Invalid login credentials", AuthErrorKind::InvalidCredentials),
    ("Email not confirmed", AuthErrorKind::UnconfirmedEmail),
    ("User already registered", AuthErrorKind::AlreadyRegistered),
    ("Password should be", AuthErrorKind::WeakPassword),
    ("Unable to validate email", AuthErrorKind::InvalidEmail),
];

/// Discriminant of [`AuthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredentials,
    UnconfirmedEmail,
    AlreadyRegistered,
    WeakPassword,
    InvalidEmail,
    PendingConfirmation,
    Unknown,
}

/// Classified failure of a gateway operation. Every kind is recoverable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password. Please check your credentials and try again.")]
    InvalidCredentials,

    #[error("Please confirm your email address before signing in.")]
    UnconfirmedEmail,

    #[error("This email is already registered. Please sign in instead or use a different email.")]
    AlreadyRegistered,

    #[error("Password must be at least 6 characters long.")]
    WeakPassword,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// Account created, but the provider issued no session until the email is confirmed.
    #[error("Please check your email to confirm your account before signing in.")]
    PendingConfirmation,

    /// Anything unrecognised, including transport outages. Carries the raw message.
    #[error("{0}")]
    Unknown(String),
}

impl AuthError {
    /// Map a provider message to a typed error by substring match.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let kind = MESSAGE_RULES
            .iter()
            .find(|(fragment, _)| message.contains(fragment))
            .map_or(AuthErrorKind::Unknown, |(_, kind)| *kind);

        match kind {
            AuthErrorKind::InvalidCredentials => Self::InvalidCredentials,
            AuthErrorKind::UnconfirmedEmail => Self::UnconfirmedEmail,
            AuthErrorKind::AlreadyRegistered => Self::AlreadyRegistered,
            AuthErrorKind::WeakPassword => Self::WeakPassword,
            AuthErrorKind::InvalidEmail => Self::InvalidEmail,
            AuthErrorKind::PendingConfirmation | AuthErrorKind::Unknown => Self::Unknown(message.to_owned()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            Self::UnconfirmedEmail => AuthErrorKind::UnconfirmedEmail,
            Self::AlreadyRegistered => AuthErrorKind::AlreadyRegistered,
            Self::WeakPassword => AuthErrorKind::WeakPassword,
            Self::InvalidEmail => AuthErrorKind::InvalidEmail,
            Self::PendingConfirmation => AuthErrorKind::PendingConfirmation,
            Self::Unknown(_) => AuthErrorKind::Unknown,
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        Self::classify(&err.message)
    }
}
