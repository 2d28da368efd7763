//! Domain service for registration, login and session management.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One message for both unknown email and wrong password, so the
    /// login form never becomes an email oracle.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A freshly issued session: what the cookie needs to carry.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a successful registration. The session is present only
/// when the caller asked to be remembered right away.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user: User,
    pub session: Option<SessionHandle>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. The first account ever created is an admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateEmail`] / [`AuthError::DuplicateUsername`]
    /// on conflict and [`AuthError::Validation`] on malformed input.
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<RegisterResult, AuthError>;

    /// Verify credentials and issue a session. Every prior session for
    /// the user is invalidated in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(User, SessionHandle), AuthError>;

    /// Revoke the session behind a token. Unknown tokens are fine;
    /// logout always succeeds from the caller's perspective.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a session token to its user. Missing, unknown and
    /// expired tokens all come back as `None`, never as an error.
    async fn current_user(&self, token: &str) -> Result<Option<User>, AuthError>;
}
