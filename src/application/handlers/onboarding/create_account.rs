//! CreateAccountHandler - Command handler for registering a connected account.

use std::sync::Arc;

use crate::config::PartnerConfig;
use crate::domain::onboarding::{validate_email, Capability, ConnectedAccount, OnboardingError};
use crate::ports::{ConnectPlatform, CreateAccountRequest};

use super::creation_failure;

/// Command to create a connected account.
///
/// Unset profile fields fall back to the configured partner profile.
#[derive(Debug, Clone, Default)]
pub struct CreateAccountCommand {
    pub email: Option<String>,
    pub business_name: Option<String>,
    pub website_url: Option<String>,
    pub capabilities: Option<Vec<Capability>>,
}

/// Result of successful account creation.
#[derive(Debug, Clone)]
pub struct CreateAccountResult {
    pub account: ConnectedAccount,
}

/// Handler for creating connected accounts.
///
/// Does not retry and does not bind the account to any session.
pub struct CreateAccountHandler {
    platform: Arc<dyn ConnectPlatform>,
    partner: PartnerConfig,
}

impl CreateAccountHandler {
    pub fn new(platform: Arc<dyn ConnectPlatform>, partner: PartnerConfig) -> Self {
        Self { platform, partner }
    }

    pub async fn handle(
        &self,
        cmd: CreateAccountCommand,
    ) -> Result<CreateAccountResult, OnboardingError> {
        // 1. Resolve the profile against configured defaults
        let email = non_blank(cmd.email).unwrap_or_else(|| self.partner.partner_email.clone());
        let business_name = non_blank(cmd.business_name)
            .unwrap_or_else(|| self.partner.partner_business_name.clone());
        let website_url = non_blank(cmd.website_url)
            .unwrap_or_else(|| self.partner.partner_website_url.clone());
        let capabilities = cmd
            .capabilities
            .filter(|c| !c.is_empty())
            .unwrap_or_else(Capability::defaults);

        // 2. Reject obviously broken profiles before calling out
        validate_email(&email)?;

        // 3. Create on the platform
        let account = self
            .platform
            .create_account(CreateAccountRequest {
                email,
                business_name,
                website_url,
                capabilities,
                idempotency_key: Some(format!("create-account-{}", uuid::Uuid::new_v4())),
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error creating connected account");
                creation_failure(e)
            })?;

        tracing::info!(account_id = %account.id, "Connected account created");

        Ok(CreateAccountResult { account })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
