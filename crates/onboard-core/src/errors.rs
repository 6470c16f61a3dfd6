//! Error taxonomy for the sign-in and enrollment flows.
//!
//! The vendor SDKs surface failures as human-readable descriptions only, so
//! classification is substring inspection. That is fragile, which is exactly
//! why it lives in one tested function here; callers must never re-match on
//! description text.

use thiserror::Error;

/// Authentication failures surfaced to the sign-in screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Sign-in was cancelled by the user")]
    UserCancelled,

    #[error("No broker application available for authentication")]
    BrokerUnavailable,

    #[error("The broker application did not respond")]
    BrokerTimeout,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

/// Enrollment failures relayed from the management SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("Enrollment failed: {0}")]
    Failed(String),
}

/// Map a vendor SDK error description onto the taxonomy.
pub fn classify_auth_failure(description: &str) -> AuthError {
    let lower = description.to_lowercase();
    if lower.contains("user canceled") || lower.contains("user cancelled") {
        AuthError::UserCancelled
    } else if lower.contains("no broker") || lower.contains("broker application") {
        AuthError::BrokerUnavailable
    } else if lower.contains("did not receive response from broker") {
        AuthError::BrokerTimeout
    } else {
        AuthError::AuthenticationFailed(description.to_string())
    }
}
