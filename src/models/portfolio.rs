use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::portfolios;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portfolio {
    pub id: i32,
    pub user_id: i32,
    pub role_name: String,
    pub jobs_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<portfolios::Model> for Portfolio {
    fn from(model: portfolios::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            role_name: model.role_name,
            jobs_count: model.jobs_count,
            created_at: model.created_at,
        }
    }
}
