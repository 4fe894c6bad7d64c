//! # Auth Errors
//!
//! Error types for password and session handling.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================
    /// Unknown user or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username already registered
    #[error("Username already registered")]
    UsernameTaken,

    /// No bearer token on a request that needs one
    #[error("Authentication required")]
    AuthenticationRequired,

    // ==================
    // Session Errors
    // ==================
    /// Token not issued by this store, or revoked
    #[error("Session invalid")]
    SessionInvalid,

    /// Token outlived the session TTL
    #[error("Session expired")]
    SessionExpired,

    // ==================
    // Internal Errors
    // ==================
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::SessionInvalid => 401,
            AuthError::SessionExpired => 401,

            AuthError::UsernameTaken => 409,

            AuthError::HashingFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }
}
