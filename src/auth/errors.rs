//! Authentication Errors
//! Mission: Typed failure kinds for login, token validation and registration

use thiserror::Error;

/// Login failures.
///
/// `AuthenticationFailed` covers both an unknown email and a wrong password, with
/// one message, so callers cannot tell which check rejected the attempt.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    AuthenticationFailed,
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("failed to issue token: {0}")]
    TokenIssue(String),
}

/// Token validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    Invalid,
}

/// Credential store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt user record: {0}")]
    CorruptRecord(String),
}

/// Registration failures
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("email already registered")]
    EmailTaken,
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => RegistrationError::EmailTaken,
            other => RegistrationError::StoreUnavailable(other.to_string()),
        }
    }
}
