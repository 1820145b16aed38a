//! `SeaORM` implementation of the `PortfolioService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::db::Store;
use crate::domain::{validate_jobs_count, validate_role_name};
use crate::models::Portfolio;
use crate::services::auth_service::AuthService;
use crate::services::portfolio_service::{PortfolioError, PortfolioService};

pub struct SeaOrmPortfolioService {
    store: Store,
    auth: Arc<dyn AuthService>,
    clock: Arc<dyn Clock>,
}

impl SeaOrmPortfolioService {
    #[must_use]
    pub fn new(store: Store, auth: Arc<dyn AuthService>, clock: Arc<dyn Clock>) -> Self {
        Self { store, auth, clock }
    }
}

#[async_trait]
impl PortfolioService for SeaOrmPortfolioService {
    async fn create_for_owner(
        &self,
        owner_id: i32,
        role_name: &str,
        jobs_count: i32,
    ) -> Result<Portfolio, PortfolioError> {
        validate_role_name(role_name)?;
        validate_jobs_count(jobs_count)?;

        let portfolio = self
            .store
            .portfolios()
            .insert(owner_id, role_name, jobs_count, self.clock.now())
            .await?;

        info!(
            event = "portfolio_created",
            user_id = owner_id,
            portfolio_id = portfolio.id,
            "Portfolio created"
        );

        Ok(portfolio)
    }

    async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Portfolio>, PortfolioError> {
        Ok(self.store.portfolios().list_by_owner(owner_id).await?)
    }

    async fn create(
        &self,
        token: Option<&str>,
        role_name: &str,
        jobs_count: i32,
    ) -> Result<Portfolio, PortfolioError> {
        let user = self.auth.require_user(token).await?;
        self.create_for_owner(user.id, role_name, jobs_count).await
    }

    async fn list(&self, token: Option<&str>) -> Result<Vec<Portfolio>, PortfolioError> {
        let user = self.auth.require_user(token).await?;
        self.list_for_owner(user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{DatabaseConfig, SecurityConfig};
    use crate::services::{CredentialHasher, IdentityResolver, SeaOrmAuthService, SessionStore};
    use chrono::Duration;

    struct Fixture {
        store: Store,
        clock: Arc<ManualClock>,
        auth: Arc<dyn AuthService>,
        portfolios: SeaOrmPortfolioService,
    }

    async fn setup() -> Fixture {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
        .unwrap();
        let clock = Arc::new(ManualClock::default());
        let hasher = CredentialHasher::new(&SecurityConfig {
            argon2_memory_cost_kib: 256,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        })
        .unwrap();
        let sessions = Arc::new(SessionStore::new(store.clone(), clock.clone()));
        let identity = Arc::new(IdentityResolver::new(store.clone(), sessions.clone()));
        let auth: Arc<dyn AuthService> = Arc::new(
            SeaOrmAuthService::new(store.clone(), hasher, sessions, identity, clock.clone())
                .unwrap(),
        );
        let portfolios = SeaOrmPortfolioService::new(store.clone(), auth.clone(), clock.clone());

        Fixture {
            store,
            clock,
            auth,
            portfolios,
        }
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let f = setup().await;
        let session = f.auth.signup("alice", "123456").await.unwrap();

        let list = f.portfolios.list(Some(&session.token)).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_negative_jobs_count_persists_nothing() {
        let f = setup().await;
        let session = f.auth.signup("alice", "123456").await.unwrap();

        match f.portfolios.create(Some(&session.token), "Engineer", -1).await {
            Err(PortfolioError::Validation(e)) => assert_eq!(e.field, "jobs_count"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(
            f.portfolios.create(Some(&session.token), "  ", 3).await,
            Err(PortfolioError::Validation(_))
        ));

        assert!(
            f.store
                .portfolios()
                .list_by_owner(session.user.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_owner_scoped() {
        let f = setup().await;
        let alice = f.auth.signup("alice", "123456").await.unwrap();
        let bob = f.auth.signup("bobby", "123456").await.unwrap();

        f.portfolios
            .create(Some(&alice.token), "Designer", 2)
            .await
            .unwrap();
        f.clock.advance(Duration::minutes(1));
        f.portfolios
            .create(Some(&bob.token), "Bob's role", 9)
            .await
            .unwrap();
        f.clock.advance(Duration::minutes(1));
        f.portfolios
            .create(Some(&alice.token), "Engineer", 0)
            .await
            .unwrap();

        let list = f.portfolios.list(Some(&alice.token)).await.unwrap();
        let roles: Vec<_> = list.iter().map(|p| p.role_name.as_str()).collect();
        assert_eq!(roles, vec!["Engineer", "Designer"]);
        assert!(list.iter().all(|p| p.user_id == alice.user.id));
    }

    #[tokio::test]
    async fn test_same_timestamp_falls_back_to_id() {
        let f = setup().await;
        let alice = f.auth.signup("alice", "123456").await.unwrap();

        let first = f
            .portfolios
            .create_for_owner(alice.user.id, "First", 1)
            .await
            .unwrap();
        let second = f
            .portfolios
            .create_for_owner(alice.user.id, "Second", 1)
            .await
            .unwrap();

        let list = f.portfolios.list_for_owner(alice.user.id).await.unwrap();
        assert_eq!(
            list.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn test_requires_live_session() {
        let f = setup().await;
        let alice = f.auth.signup("alice", "123456").await.unwrap();

        assert!(matches!(
            f.portfolios.list(None).await,
            Err(PortfolioError::Unauthenticated)
        ));
        assert!(matches!(
            f.portfolios.create(Some("bogus"), "Engineer", 1).await,
            Err(PortfolioError::Unauthenticated)
        ));

        f.clock.advance(Duration::days(8));
        assert!(matches!(
            f.portfolios.create(Some(&alice.token), "Engineer", 1).await,
            Err(PortfolioError::Unauthenticated)
        ));
        assert!(
            f.store
                .portfolios()
                .list_by_owner(alice.user.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let f = setup().await;
        let alice = f.auth.signup("alice", "123456").await.unwrap();
        f.portfolios
            .create(Some(&alice.token), "Engineer", 4)
            .await
            .unwrap();

        assert!(f.store.users().delete(alice.user.id).await.unwrap());

        assert!(
            f.store
                .portfolios()
                .list_by_owner(alice.user.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            f.store.sessions().count_for_user(alice.user.id).await.unwrap(),
            0
        );
    }
}
