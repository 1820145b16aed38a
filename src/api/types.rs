use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Portfolio, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::error(message)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDto {
    pub id: i32,
    pub user_id: i32,
    pub role_name: String,
    pub jobs_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Portfolio> for PortfolioDto {
    fn from(portfolio: Portfolio) -> Self {
        Self {
            id: portfolio.id,
            user_id: portfolio.user_id,
            role_name: portfolio.role_name,
            jobs_count: portfolio.jobs_count,
            created_at: portfolio.created_at,
        }
    }
}

/// Result shape shared by signup, login, logout and check-auth.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}

impl AuthResult {
    pub fn authenticated(message: impl Into<String>, user: &User) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(UserDto::from(user)),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub role_name: String,
    pub jobs_count: i32,
}
