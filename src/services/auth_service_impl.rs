//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::db::{Store, UserRepository, is_unique_violation};
use crate::domain::{validate_password, validate_username};
use crate::models::User;
use crate::services::auth_service::{
    AuthError, AuthService, AuthSession, AuthStatus, LogoutOutcome,
};
use crate::services::credentials::CredentialHasher;
use crate::services::identity::IdentityResolver;
use crate::services::session_store::SessionStore;

pub struct SeaOrmAuthService {
    store: Store,
    hasher: CredentialHasher,
    sessions: Arc<SessionStore>,
    identity: Arc<IdentityResolver>,
    clock: Arc<dyn Clock>,
    /// Verified against when the username is unknown so both failure paths
    /// spend the same Argon2 work.
    dummy_hash: String,
}

impl SeaOrmAuthService {
    pub fn new(
        store: Store,
        hasher: CredentialHasher,
        sessions: Arc<SessionStore>,
        identity: Arc<IdentityResolver>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash("folio-dummy-password")?;

        Ok(Self {
            store,
            hasher,
            sessions,
            identity,
            clock,
            dummy_hash,
        })
    }

    fn reject_login(&self, reason: &'static str) -> AuthError {
        metrics::counter!("auth_failures_total", "reason" => reason).increment(1);
        AuthError::InvalidCredentials
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        validate_username(username)?;
        validate_password(password)?;

        let password_hash = self.hasher.hash_blocking(password).await?;

        let txn = self.store.begin().await?;

        let user = match UserRepository::new(&txn)
            .insert(username, &password_hash, self.clock.now())
            .await
        {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => return Err(AuthError::UsernameTaken),
            Err(e) => return Err(e.into()),
        };

        let issued = self.sessions.create_in(&txn, user.id).await?;

        txn.commit().await?;

        info!(
            event = "user_signed_up",
            user_id = user.id,
            "Created user {}",
            user.username
        );

        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some((user, password_hash)) = self.store.users().get_credentials(username).await?
        else {
            let _ = self
                .hasher
                .verify_blocking(password, &self.dummy_hash)
                .await;
            return Err(self.reject_login("unknown_user"));
        };

        if !self.hasher.verify_blocking(password, &password_hash).await {
            return Err(self.reject_login("bad_password"));
        }

        let issued = self.sessions.create(user.id).await?;

        info!(event = "user_logged_in", user_id = user.id, "Login successful");

        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn logout(&self, token: Option<&str>) -> Result<LogoutOutcome, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(LogoutOutcome::NotAuthenticated);
        };

        self.sessions.revoke(token).await?;
        Ok(LogoutOutcome::LoggedOut)
    }

    async fn check_auth(&self, token: Option<&str>) -> Result<AuthStatus, AuthError> {
        if token.is_none_or(str::is_empty) {
            return Ok(AuthStatus::NotAuthenticated);
        }

        Ok(self
            .identity
            .current_user(token)
            .await?
            .map_or(AuthStatus::InvalidSession, AuthStatus::Authenticated))
    }

    async fn require_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        self.identity
            .current_user(token)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
