//! Session Store Port - caller session to connected account bindings.
//!
//! Refresh and return callbacks may arrive without an `account_id` query
//! parameter; the boundary then resolves the account through the caller's
//! session.
//!
//! Binding policy is last-write-wins: a session holds at most one account id,
//! and a later `bind` for the same session replaces the earlier one.

use async_trait::async_trait;

use crate::domain::onboarding::{AccountId, SessionId};

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for session → account bindings
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Bind a session to an account, returning the binding it replaced.
    async fn bind(
        &self,
        session_id: SessionId,
        account_id: AccountId,
    ) -> Result<Option<AccountId>, SessionStoreError>;

    /// Look up the account bound to a session.
    async fn lookup(&self, session_id: SessionId) -> Result<Option<AccountId>, SessionStoreError>;
}
