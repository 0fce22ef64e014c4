//! In-memory store mapping Telegram users to their Unsplash access tokens.
//!
//! Tokens are held for the lifetime of the process only; a restart means
//! users have to run /authorize again. The map is unbounded and never
//! expires entries.

use std::collections::HashMap;

use teloxide::types::UserId;
use tokio::sync::RwLock;

/// Shared token map. Handlers run concurrently, so access goes through an
/// async RwLock; lookups vastly outnumber writes.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<UserId, String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the access token for a user.
    pub async fn insert(&self, user_id: UserId, token: String) {
        self.tokens.write().await.insert(user_id, token);
    }

    /// Returns a clone of the user's access token, if one is stored.
    pub async fn get(&self, user_id: UserId) -> Option<String> {
        self.tokens.read().await.get(&user_id).cloned()
    }
}
