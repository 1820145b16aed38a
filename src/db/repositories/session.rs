use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::sessions;
use crate::models::Session;

pub struct SessionRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SessionRepository<'c, C> {
    #[must_use]
    pub const fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        token: &str,
        user_id: i32,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        let model = sessions::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            created_at: Set(created_at),
            expires_at: Set(expires_at),
            ..Default::default()
        }
        .insert(self.conn)
        .await
        .context("Failed to insert session")?;

        Ok(Session::from(model))
    }

    /// Exact token lookup, regardless of expiry
    pub async fn get_by_token(&self, token: &str) -> Result<Option<Session>> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(self.conn)
            .await
            .context("Failed to query session by token")?;

        Ok(session.map(Session::from))
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(result.rows_affected)
    }

    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(self.conn)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected)
    }

    pub async fn count_for_user(&self, user_id: i32) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .count(self.conn)
            .await
            .context("Failed to count sessions")?;

        Ok(count)
    }
}
