//! StartOnboardingHandler - Command handler for the create-then-link flow.

use std::sync::Arc;

use crate::config::PartnerConfig;
use crate::domain::onboarding::{AccountId, OnboardingError, OnboardingLink};
use crate::ports::ConnectPlatform;

use super::{
    CreateAccountCommand, CreateAccountHandler, IssueOnboardingLinkCommand,
    IssueOnboardingLinkHandler,
};

/// Command to start onboarding a new partner.
#[derive(Debug, Clone, Default)]
pub struct StartOnboardingCommand {
    pub profile: CreateAccountCommand,
}

/// Result of a started onboarding.
#[derive(Debug, Clone)]
pub struct StartOnboardingResult {
    pub account_id: AccountId,
    pub onboarding_url: String,
    pub link: OnboardingLink,
}

/// Handler that creates an account and immediately issues its first link.
///
/// If link creation fails the account still exists on the platform; the
/// error is returned and a later refresh can mint a link for it.
pub struct StartOnboardingHandler {
    create_account: CreateAccountHandler,
    issue_link: IssueOnboardingLinkHandler,
    partner: PartnerConfig,
}

impl StartOnboardingHandler {
    pub fn new(platform: Arc<dyn ConnectPlatform>, partner: PartnerConfig) -> Self {
        Self {
            create_account: CreateAccountHandler::new(platform.clone(), partner.clone()),
            issue_link: IssueOnboardingLinkHandler::new(platform),
            partner,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartOnboardingCommand,
    ) -> Result<StartOnboardingResult, OnboardingError> {
        let account = self.create_account.handle(cmd.profile).await?.account;

        let link = self
            .issue_link
            .handle(IssueOnboardingLinkCommand::initial(
                account.id.clone(),
                &self.partner,
            ))
            .await?
            .link;

        Ok(StartOnboardingResult {
            account_id: account.id,
            onboarding_url: link.url.clone(),
            link,
        })
    }
}
