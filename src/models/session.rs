use chrono::{DateTime, Utc};

use crate::entities::sessions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i32,
    pub token: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Valid iff expiry is strictly after `now`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl From<sessions::Model> for Session {
    fn from(model: sessions::Model) -> Self {
        Self {
            id: model.id,
            token: model.token,
            user_id: model.user_id,
            created_at: model.created_at,
            expires_at: model.expires_at,
        }
    }
}

/// What the caller gets back from issuing a session: enough to set the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let session = Session {
            id: 1,
            token: "t".to_string(),
            user_id: 1,
            created_at: now,
            expires_at: now + Duration::days(7),
        };

        assert!(session.is_live_at(now));
        assert!(session.is_live_at(now + Duration::days(7) - Duration::seconds(1)));
        assert!(!session.is_live_at(now + Duration::days(7)));
        assert!(!session.is_live_at(now + Duration::days(7) + Duration::seconds(1)));
    }
}
