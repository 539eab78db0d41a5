//! CheckCompletionHandler - Query handler for onboarding completion.

use std::sync::Arc;

use crate::domain::onboarding::{AccountId, CompletionStatus, OnboardingError};
use crate::ports::ConnectPlatform;

use super::account_failure;

/// Query for the current completion state of an account.
#[derive(Debug, Clone)]
pub struct CheckCompletionQuery {
    pub account_id: AccountId,
}

/// Result of a completion check.
#[derive(Debug, Clone)]
pub struct CheckCompletionResult {
    pub account_id: AccountId,
    pub status: CompletionStatus,
}

/// Handler for checking onboarding completion.
///
/// Reads the live snapshot on every call; nothing is cached.
pub struct CheckCompletionHandler {
    platform: Arc<dyn ConnectPlatform>,
}

impl CheckCompletionHandler {
    pub fn new(platform: Arc<dyn ConnectPlatform>) -> Self {
        Self { platform }
    }

    pub async fn handle(
        &self,
        query: CheckCompletionQuery,
    ) -> Result<CheckCompletionResult, OnboardingError> {
        let account = self
            .platform
            .retrieve_account(&query.account_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    account_id = %query.account_id,
                    error = %e,
                    "Error checking account status"
                );
                account_failure(e, &query.account_id)
            })?;

        let status = CompletionStatus::from_requirements(&account.requirements);

        if status.complete {
            tracing::info!(account_id = %query.account_id, "Onboarding complete");
        } else {
            tracing::info!(
                account_id = %query.account_id,
                currently_due = ?status.currently_due,
                eventually_due = ?status.eventually_due,
                "Onboarding incomplete"
            );
        }

        Ok(CheckCompletionResult {
            account_id: query.account_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockConnectPlatform;
    use crate::domain::onboarding::Requirements;
    use crate::ports::PlatformError;

    fn query(id: &str) -> CheckCompletionQuery {
        CheckCompletionQuery {
            account_id: AccountId::new(id).unwrap(),
        }
    }

    #[tokio::test]
    async fn incomplete_when_anything_is_due() {
        let mock = MockConnectPlatform::with_account(
            "acct_123",
            vec!["individual.id_number".to_string()],
            vec![],
        );
        let handler = CheckCompletionHandler::new(Arc::new(mock));

        let result = handler.handle(query("acct_123")).await.unwrap();

        assert_eq!(
            result.status,
            CompletionStatus {
                complete: false,
                currently_due: vec!["individual.id_number".to_string()],
                eventually_due: vec![],
            }
        );
    }

    #[tokio::test]
    async fn eventually_due_alone_is_incomplete() {
        let mock = MockConnectPlatform::with_account(
            "acct_123",
            vec![],
            vec!["external_account".to_string()],
        );
        let handler = CheckCompletionHandler::new(Arc::new(mock));

        let result = handler.handle(query("acct_123")).await.unwrap();
        assert!(!result.status.complete);
    }

    #[tokio::test]
    async fn reads_live_snapshot_every_call() {
        let mock = MockConnectPlatform::with_account(
            "acct_123",
            vec!["business_type".to_string()],
            vec!["business_type".to_string()],
        );
        let handler = CheckCompletionHandler::new(Arc::new(mock.clone()));

        assert!(!handler.handle(query("acct_123")).await.unwrap().status.complete);

        mock.set_requirements("acct_123", Requirements::default());
        assert!(handler.handle(query("acct_123")).await.unwrap().status.complete);
        assert_eq!(mock.call_count("retrieve_account"), 2);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let handler = CheckCompletionHandler::new(Arc::new(MockConnectPlatform::new()));

        let err = handler.handle(query("acct_ghost")).await.unwrap_err();
        assert_eq!(err, OnboardingError::account_not_found("acct_ghost"));
    }

    #[tokio::test]
    async fn outage_is_unavailable() {
        let mock = MockConnectPlatform::with_account("acct_123", vec![], vec![]);
        mock.set_error(PlatformError::network("connection reset"));
        let handler = CheckCompletionHandler::new(Arc::new(mock));

        let err = handler.handle(query("acct_123")).await.unwrap_err();
        assert!(matches!(err, OnboardingError::PlatformUnavailable(_)));
    }
}
