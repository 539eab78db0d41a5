//! In-Memory Session Store Adapter
//!
//! Stores session → account bindings in memory. Bindings are lost on
//! restart; callers then fall back to the `account_id` query parameter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::onboarding::{AccountId, SessionId};
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for session bindings
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    bindings: Arc<RwLock<HashMap<SessionId, AccountId>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            bindings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of live bindings
    pub async fn binding_count(&self) -> usize {
        self.bindings.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn bind(
        &self,
        session_id: SessionId,
        account_id: AccountId,
    ) -> Result<Option<AccountId>, SessionStoreError> {
        let previous = self.bindings.write().await.insert(session_id, account_id);
        if let Some(previous) = &previous {
            tracing::debug!(%session_id, %previous, "Session binding replaced");
        }
        Ok(previous)
    }

    async fn lookup(&self, session_id: SessionId) -> Result<Option<AccountId>, SessionStoreError> {
        Ok(self.bindings.read().await.get(&session_id).cloned())
    }
}
