use super::*;

// =============================================================================
// AuthError::classify
// =============================================================================

#[test]
fn classify_invalid_credentials() {
    assert_eq!(AuthError::classify("Invalid login credentials"), AuthError::InvalidCredentials);
}

#[test]
fn classify_unconfirmed_email() {
    assert_eq!(AuthError::classify("Email not confirmed"), AuthError::UnconfirmedEmail);
}

#[test]
fn classify_already_registered() {
    assert_eq!(AuthError::classify("User already registered"), AuthError::AlreadyRegistered);
}

#[test]
fn classify_weak_password_by_prefix() {
    let err = AuthError::classify("Password should be at least 6 characters.");
    assert_eq!(err, AuthError::WeakPassword);
}

#[test]
fn classify_invalid_email_inside_longer_message() {
    let err = AuthError::classify("Unable to validate email address: invalid format");
    assert_eq!(err, AuthError::InvalidEmail);
}

#[test]
fn classify_unknown_keeps_raw_message() {
    let err = AuthError::classify("HTTP 503");
    assert_eq!(err, AuthError::Unknown("HTTP 503".into()));
    assert_eq!(err.to_string(), "HTTP 503");
}

#[test]
fn classify_is_case_sensitive() {
    assert_eq!(AuthError::classify("invalid login credentials").kind(), AuthErrorKind::Unknown);
}

#[test]
fn classify_never_yields_pending_confirmation() {
    let err = AuthError::classify("Please check your email to confirm your account before signing in.");
    assert_eq!(err.kind(), AuthErrorKind::Unknown);
}

#[test]
fn provider_error_converts_through_classifier() {
    let err: AuthError = ProviderError::new("Invalid login credentials").into();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
}

// =============================================================================
// AuthError::kind / Display
// =============================================================================

#[test]
fn kind_matches_variant() {
    assert_eq!(AuthError::PendingConfirmation.kind(), AuthErrorKind::PendingConfirmation);
    assert_eq!(AuthError::WeakPassword.kind(), AuthErrorKind::WeakPassword);
    assert_eq!(AuthError::Unknown(String::new()).kind(), AuthErrorKind::Unknown);
}

#[test]
fn display_is_user_facing() {
    assert_eq!(
        AuthError::InvalidCredentials.to_string(),
        "Invalid email or password. Please check your credentials and try again."
    );
    assert_eq!(
        AuthError::PendingConfirmation.to_string(),
        "Please check your email to confirm your account before signing in."
    );
}
