//! Domain service for owner-scoped portfolio records.

use thiserror::Error;

use crate::domain::ValidationError;
use crate::models::Portfolio;
use crate::services::auth_service::AuthError;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for PortfolioError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PortfolioError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<AuthError> for PortfolioError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => Self::Unauthenticated,
            AuthError::Validation(e) => Self::Validation(e),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Domain service trait for portfolios.
///
/// The `*_for_owner` methods assume the caller already established identity;
/// the token-taking methods gate on the session first and touch nothing when
/// it is missing or expired.
#[async_trait::async_trait]
pub trait PortfolioService: Send + Sync {
    /// Validates and inserts. Nothing is persisted on a validation failure.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::Validation`] for an empty role name or a
    /// negative job count.
    async fn create_for_owner(
        &self,
        owner_id: i32,
        role_name: &str,
        jobs_count: i32,
    ) -> Result<Portfolio, PortfolioError>;

    /// Most recent first. Empty when the owner has none.
    async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Portfolio>, PortfolioError>;

    async fn create(
        &self,
        token: Option<&str>,
        role_name: &str,
        jobs_count: i32,
    ) -> Result<Portfolio, PortfolioError>;

    async fn list(&self, token: Option<&str>) -> Result<Vec<Portfolio>, PortfolioError>;
}
