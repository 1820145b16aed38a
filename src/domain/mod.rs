//! Domain rules shared by the services and the HTTP layer.

pub mod validation;

pub use validation::{
    ValidationError, validate_jobs_count, validate_password, validate_role_name,
    validate_username,
};
