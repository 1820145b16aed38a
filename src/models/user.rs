use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::users;

/// Public user fields. The password hash never leaves the repository layer
/// except through `UserRepository::get_credentials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}
