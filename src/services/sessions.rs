//! In-memory session store for cookie-based auth.
//!
//! Sessions are opaque uuid tokens mapped to user ids. There is no expiry;
//! a logout or a process restart drops the session.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::UserId;

/// Session metadata.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory session store.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create a new session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a user and return its token.
    pub fn create(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            created_at: chrono::Utc::now(),
        };
        self.sessions.write().insert(token.clone(), session);
        token
    }

    /// Look up the user behind a token.
    pub fn get(&self, token: &str) -> Option<UserId> {
        self.sessions.read().get(token).map(|s| s.user_id)
    }

    /// Drop a session. Unknown tokens are a no-op.
    pub fn remove(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let store = SessionStore::new();
        let token = store.create(UserId::new(7));
        assert_eq!(store.get(&token), Some(UserId::new(7)));

        store.remove(&token);
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn test_unknown_token_is_none() {
        let store = SessionStore::new();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new();
        let a = store.create(UserId::new(1));
        let b = store.create(UserId::new(1));
        assert_ne!(a, b);
    }
}
