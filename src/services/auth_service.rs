//! Domain service for signup, login, logout and session checks.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::ValidationError;
use crate::models::User;
use crate::services::credentials::CredentialError;
use crate::services::session_store::SessionError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    UsernameTaken,

    /// Same variant whether the username was unknown or the password wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Session token collision")]
    SessionCollision,

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
        Self::Database(format!("{err:#}"))
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Collision => Self::SessionCollision,
            SessionError::Database(msg) => Self::Database(msg),
        }
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A freshly issued session plus the public fields of its owner.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// No token was presented.
    NotAuthenticated,
    /// A token was presented but is unknown or expired.
    InvalidSession,
    Authenticated(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    NotAuthenticated,
    LoggedOut,
}

/// Domain service trait for authentication.
///
/// Tokens are always passed explicitly; nothing here reads request state.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates the user and its first session in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a short username or password and
    /// [`AuthError::UsernameTaken`] if the name is in use.
    async fn signup(&self, username: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Verifies credentials and issues a new session. Prior sessions are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Revokes the presented session, if any.
    async fn logout(&self, token: Option<&str>) -> Result<LogoutOutcome, AuthError>;

    async fn check_auth(&self, token: Option<&str>) -> Result<AuthStatus, AuthError>;

    /// Gate for operations that need an identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when no live session backs `token`.
    async fn require_user(&self, token: Option<&str>) -> Result<User, AuthError>;
}
