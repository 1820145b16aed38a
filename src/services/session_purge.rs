//! Periodic removal of expired session rows.
//!
//! Expired sessions already fail to resolve; this only keeps the table small.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::services::session_store::SessionStore;

pub struct SessionPurger {
    sessions: Arc<SessionStore>,
    every: Duration,
}

impl SessionPurger {
    #[must_use]
    pub const fn new(sessions: Arc<SessionStore>, interval_minutes: u64) -> Self {
        Self {
            sessions,
            every: Duration::from_secs(interval_minutes.saturating_mul(60)),
        }
    }

    /// Spawns the purge loop. Returns `None` when the interval is zero.
    #[must_use]
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if self.every.is_zero() {
            info!("Session purge task is disabled");
            return None;
        }

        Some(tokio::spawn(async move { self.run().await }))
    }

    async fn run(self) {
        info!("Session purge running every {}m", self.every.as_secs() / 60);

        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            debug!(event = "job_started", job_name = "purge_sessions");

            if let Err(e) = self.sessions.purge_expired().await {
                error!(
                    event = "job_failed",
                    job_name = "purge_sessions",
                    error = %e,
                    "Session purge failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::DatabaseConfig;
    use crate::db::Store;

    #[tokio::test]
    async fn test_zero_interval_disables_task() {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
        .unwrap();
        let sessions = Arc::new(SessionStore::new(store, Arc::new(ManualClock::default())));

        assert!(SessionPurger::new(sessions.clone(), 0).spawn().is_none());

        let handle = SessionPurger::new(sessions, 60).spawn().unwrap();
        handle.abort();
    }
}
