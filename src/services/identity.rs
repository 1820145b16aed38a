//! Maps a session token to the user it authenticates.

use std::sync::Arc;

use crate::db::Store;
use crate::models::User;
use crate::services::session_store::{SessionError, SessionStore};

pub struct IdentityResolver {
    store: Store,
    sessions: Arc<SessionStore>,
}

impl IdentityResolver {
    #[must_use]
    pub const fn new(store: Store, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    /// `None` when the token is missing, unknown, expired, or points at a
    /// user row that no longer exists.
    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, SessionError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let Some(session) = self.sessions.resolve(token).await? else {
            return Ok(None);
        };

        let user = self.store.users().get_by_id(session.user_id).await?;
        if user.is_none() {
            tracing::warn!(
                event = "session_orphaned",
                user_id = session.user_id,
                "Live session references a missing user"
            );
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::config::DatabaseConfig;
    use chrono::Duration;

    async fn setup() -> (Store, Arc<ManualClock>, Arc<SessionStore>, IdentityResolver) {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
        .unwrap();
        let clock = Arc::new(ManualClock::default());
        let sessions = Arc::new(SessionStore::new(store.clone(), clock.clone()));
        let identity = IdentityResolver::new(store.clone(), sessions.clone());
        (store, clock, sessions, identity)
    }

    #[tokio::test]
    async fn test_missing_or_empty_token() {
        let (_, _, _, identity) = setup().await;
        assert!(identity.current_user(None).await.unwrap().is_none());
        assert!(identity.current_user(Some("")).await.unwrap().is_none());
        assert!(identity.current_user(Some("bogus")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_live_session_resolves_user() {
        let (store, clock, sessions, identity) = setup().await;
        let user = store
            .users()
            .insert("alice", "$argon2id$placeholder", clock.now())
            .await
            .unwrap();
        let issued = sessions.create(user.id).await.unwrap();

        let current = identity
            .current_user(Some(&issued.token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current, user);

        clock.advance(Duration::days(7) + Duration::seconds(1));
        assert!(
            identity
                .current_user(Some(&issued.token))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_deleted_user_resolves_to_none() {
        let (store, clock, sessions, identity) = setup().await;
        let user = store
            .users()
            .insert("alice", "$argon2id$placeholder", clock.now())
            .await
            .unwrap();
        let issued = sessions.create(user.id).await.unwrap();

        assert!(store.users().delete(user.id).await.unwrap());
        assert!(
            identity
                .current_user(Some(&issued.token))
                .await
                .unwrap()
                .is_none()
        );
    }
}
