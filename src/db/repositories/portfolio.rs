use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::portfolios;
use crate::models::Portfolio;

pub struct PortfolioRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> PortfolioRepository<'c, C> {
    #[must_use]
    pub const fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Raw insert; callers validate first.
    pub async fn insert(
        &self,
        user_id: i32,
        role_name: &str,
        jobs_count: i32,
        created_at: DateTime<Utc>,
    ) -> Result<Portfolio> {
        let model = portfolios::ActiveModel {
            user_id: Set(user_id),
            role_name: Set(role_name.to_string()),
            jobs_count: Set(jobs_count),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(self.conn)
        .await
        .context("Failed to insert portfolio")?;

        Ok(Portfolio::from(model))
    }

    /// Most recent first; ties on `created_at` fall back to the newest id.
    pub async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Portfolio>> {
        let rows = portfolios::Entity::find()
            .filter(portfolios::Column::UserId.eq(user_id))
            .order_by_desc(portfolios::Column::CreatedAt)
            .order_by_desc(portfolios::Column::Id)
            .all(self.conn)
            .await
            .context("Failed to list portfolios")?;

        Ok(rows.into_iter().map(Portfolio::from).collect())
    }
}
