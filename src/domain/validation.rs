//! Input validation for user-supplied fields.
//!
//! Every failure names the offending field so the API can surface a
//! field-level message instead of a generic 400.

use thiserror::Error;

use crate::constants::limits::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}


/// Usernames are case-sensitive and counted in characters, not bytes.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::new(
            "username",
            format!("Username must be at least {MIN_USERNAME_LEN} characters long"),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    Ok(())
}

pub fn validate_role_name(role_name: &str) -> Result<(), ValidationError> {
    if role_name.trim().is_empty() {
        return Err(ValidationError::new("role_name", "Role name cannot be empty"));
    }
    Ok(())
}

pub fn validate_jobs_count(jobs_count: i32) -> Result<(), ValidationError> {
    if jobs_count < 0 {
        return Err(ValidationError::new("jobs_count", "Jobs count cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("Alice").is_ok());
        assert!(validate_username("äöü").is_ok());

        let err = validate_username("ab").unwrap_err();
        assert_eq!(err.field, "username");
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert_eq!(validate_password("12345").unwrap_err().field, "password");
    }

    #[test]
    fn test_validate_role_name() {
        assert!(validate_role_name("Backend Engineer").is_ok());
        assert!(validate_role_name("").is_err());
        assert!(validate_role_name("   ").is_err());
    }

    #[test]
    fn test_validate_jobs_count() {
        assert!(validate_jobs_count(0).is_ok());
        assert!(validate_jobs_count(42).is_ok());

        let err = validate_jobs_count(-1).unwrap_err();
        assert_eq!(err.field, "jobs_count");
        assert_eq!(err.to_string(), "jobs_count: Jobs count cannot be negative");
    }
}
