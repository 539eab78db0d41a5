//! IssueOnboardingLinkHandler - Command handler for minting hosted onboarding links.
//!
//! Serves both the first link after account creation and every refresh after
//! a link expired or was abandoned. The two differ only in how they are logged.

use std::sync::Arc;

use crate::config::PartnerConfig;
use crate::domain::onboarding::{
    AccountId, CollectionFields, LinkPurpose, LinkReason, OnboardingError, OnboardingLink,
};
use crate::ports::{ConnectPlatform, CreateAccountLinkRequest};

use super::account_failure;

/// Command to issue an onboarding link.
#[derive(Debug, Clone)]
pub struct IssueOnboardingLinkCommand {
    pub account_id: AccountId,
    pub refresh_url: String,
    pub return_url: String,
    pub reason: LinkReason,
}

impl IssueOnboardingLinkCommand {
    /// First link for a freshly created account.
    pub fn initial(account_id: AccountId, partner: &PartnerConfig) -> Self {
        Self {
            account_id,
            refresh_url: partner.refresh_url.clone(),
            return_url: partner.return_url.clone(),
            reason: LinkReason::Initial,
        }
    }

    /// Replacement link after the previous one expired or was abandoned.
    pub fn refresh(account_id: AccountId, partner: &PartnerConfig) -> Self {
        Self {
            reason: LinkReason::Refresh,
            ..Self::initial(account_id, partner)
        }
    }
}

/// Result of successful link creation.
#[derive(Debug, Clone)]
pub struct IssueOnboardingLinkResult {
    pub link: OnboardingLink,
}

/// Handler for issuing onboarding links.
///
/// Every call mints a new link; links are never cached or reused.
pub struct IssueOnboardingLinkHandler {
    platform: Arc<dyn ConnectPlatform>,
}

impl IssueOnboardingLinkHandler {
    pub fn new(platform: Arc<dyn ConnectPlatform>) -> Self {
        Self { platform }
    }

    pub async fn handle(
        &self,
        cmd: IssueOnboardingLinkCommand,
    ) -> Result<IssueOnboardingLinkResult, OnboardingError> {
        let account_id = cmd.account_id;

        let link = self
            .platform
            .create_account_link(CreateAccountLinkRequest {
                account_id: account_id.clone(),
                refresh_url: cmd.refresh_url,
                return_url: cmd.return_url,
                purpose: LinkPurpose::AccountOnboarding,
                collect: CollectionFields::EventuallyDue,
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    account_id = %account_id,
                    reason = %cmd.reason,
                    error = %e,
                    "Error creating account link"
                );
                account_failure(e, &account_id)
            })?;

        tracing::info!(
            account_id = %account_id,
            reason = %cmd.reason,
            expires_at = link.expires_at,
            "Onboarding link issued"
        );

        Ok(IssueOnboardingLinkResult { link })
    }
}
