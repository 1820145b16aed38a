//! Persistent session records keyed by an opaque token.
//!
//! Tokens are UUID v4 strings (122 random bits). Expiry is stamped once at
//! creation and never moved; a session is live only while `expires_at > now`.

use chrono::Duration;
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::constants;
use crate::db::{SessionRepository, Store, is_unique_violation};
use crate::models::{IssuedSession, Session};

#[derive(Debug, Error)]
pub enum SessionError {
    /// Two sessions drew the same token. Fatal; never retried.
    #[error("Session token collision")]
    Collision,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[must_use]
pub fn session_lifetime() -> Duration {
    Duration::days(constants::session::LIFETIME_DAYS)
}

pub struct SessionStore {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn create(&self, user_id: i32) -> Result<IssuedSession, SessionError> {
        self.create_in(&self.store.conn, user_id).await
    }

    /// Issue a session on `conn`, which may be an open transaction.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<IssuedSession, SessionError> {
        let token = Uuid::new_v4().to_string();
        self.create_with_token(conn, user_id, &token).await
    }

    /// Insert a session under a caller-chosen token. An existing token is
    /// never reissued: the clash comes back as [`SessionError::Collision`].
    pub(crate) async fn create_with_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        token: &str,
    ) -> Result<IssuedSession, SessionError> {
        let now = self.clock.now();
        let expires_at = now + session_lifetime();

        match SessionRepository::new(conn)
            .insert(token, user_id, now, expires_at)
            .await
        {
            Ok(session) => {
                metrics::counter!("sessions_created_total").increment(1);
                Ok(IssuedSession {
                    token: session.token,
                    expires_at: session.expires_at,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                error!(
                    event = "session_token_collision",
                    user_id = user_id,
                    "Generated session token already exists"
                );
                Err(SessionError::Collision)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `None` for unknown and expired tokens alike.
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let session = self.store.sessions().get_by_token(token).await?;
        let now = self.clock.now();

        Ok(session.filter(|s| s.is_live_at(now)))
    }

    /// Idempotent: revoking an unknown token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let removed = self.store.sessions().delete_by_token(token).await?;
        if removed > 0 {
            metrics::counter!("sessions_revoked_total").increment(removed);
        }
        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64, SessionError> {
        let removed = self
            .store
            .sessions()
            .delete_expired(self.clock.now())
            .await?;

        if removed > 0 {
            metrics::counter!("sessions_purged_total").increment(removed);
            info!(
                event = "sessions_purged",
                removed = removed,
                "Removed expired sessions"
            );
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::DatabaseConfig;
    use crate::services::AuthError;
    use chrono::{TimeZone, Utc};

    async fn setup() -> (Store, Arc<ManualClock>, SessionStore) {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
        .unwrap();

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let sessions = SessionStore::new(store.clone(), clock.clone());
        (store, clock, sessions)
    }

    async fn add_user(store: &Store, clock: &ManualClock, name: &str) -> i32 {
        store
            .users()
            .insert(name, "$argon2id$placeholder", clock.now())
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let (store, clock, sessions) = setup().await;
        let user_id = add_user(&store, &clock, "alice").await;

        let issued = sessions.create(user_id).await.unwrap();
        assert_eq!(issued.expires_at, clock.now() + Duration::days(7));
        assert!(Uuid::parse_str(&issued.token).is_ok());

        let session = sessions.resolve(&issued.token).await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.token, issued.token);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let (_store, _clock, sessions) = setup().await;
        assert!(sessions.resolve("never-issued").await.unwrap().is_none());
        assert!(
            sessions
                .resolve(&Uuid::new_v4().to_string())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_expiry_boundaries() {
        let (store, clock, sessions) = setup().await;
        let user_id = add_user(&store, &clock, "alice").await;
        let issued = sessions.create(user_id).await.unwrap();

        clock.advance(Duration::days(6) + Duration::hours(23));
        assert!(sessions.resolve(&issued.token).await.unwrap().is_some());

        clock.advance(Duration::hours(1));
        assert!(sessions.resolve(&issued.token).await.unwrap().is_none());

        clock.advance(Duration::seconds(1));
        assert!(sessions.resolve(&issued.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (store, clock, sessions) = setup().await;
        let user_id = add_user(&store, &clock, "alice").await;
        let issued = sessions.create(user_id).await.unwrap();

        sessions.revoke(&issued.token).await.unwrap();
        assert!(sessions.resolve(&issued.token).await.unwrap().is_none());

        sessions.revoke(&issued.token).await.unwrap();
        sessions.revoke("never-issued").await.unwrap();
    }

    #[tokio::test]
    async fn test_each_create_issues_a_new_token() {
        let (store, clock, sessions) = setup().await;
        let user_id = add_user(&store, &clock, "alice").await;

        let first = sessions.create(user_id).await.unwrap();
        let second = sessions.create(user_id).await.unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(store.sessions().count_for_user(user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_token_is_a_collision() {
        let (store, clock, sessions) = setup().await;
        let alice = add_user(&store, &clock, "alice").await;
        let bob = add_user(&store, &clock, "bob").await;
        let issued = sessions.create(alice).await.unwrap();

        clock.advance(Duration::hours(1));
        let result = sessions
            .create_with_token(&store.conn, bob, &issued.token)
            .await;
        assert!(matches!(result, Err(SessionError::Collision)));

        // the original row keeps its owner and expiry
        let original = store
            .sessions()
            .get_by_token(&issued.token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(original.user_id, alice);
        assert_eq!(original.expires_at, issued.expires_at);
        assert_eq!(store.sessions().count_for_user(bob).await.unwrap(), 0);

        assert!(matches!(
            AuthError::from(SessionError::Collision),
            AuthError::SessionCollision
        ));
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired() {
        let (store, clock, sessions) = setup().await;
        let user_id = add_user(&store, &clock, "alice").await;

        let old = sessions.create(user_id).await.unwrap();
        clock.advance(Duration::days(3));
        let fresh = sessions.create(user_id).await.unwrap();

        clock.advance(Duration::days(5));
        assert_eq!(sessions.purge_expired().await.unwrap(), 1);

        assert!(store.sessions().get_by_token(&old.token).await.unwrap().is_none());
        assert!(sessions.resolve(&fresh.token).await.unwrap().is_some());
        assert_eq!(sessions.purge_expired().await.unwrap(), 0);
    }
}
