use std::time::Duration;

use auth::SessionToken;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// Server-side record behind a session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user_id` that lives for `ttl`.
    pub fn start(token: SessionToken, user_id: UserId, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token,
            user_id,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
