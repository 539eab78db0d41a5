//! HandleAccountWebhookHandler - Command handler for platform webhooks.

use std::sync::Arc;

use crate::domain::onboarding::{AccountId, OnboardingError, PlatformEventType};
use crate::ports::ConnectPlatform;

/// Command to handle a platform webhook.
#[derive(Debug, Clone)]
pub struct HandleAccountWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// What the service did with a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// `account.updated` observed and logged.
    AccountUpdated { account_id: Option<AccountId> },
    /// Any other event type; acknowledged only.
    Ignored { event_type: String },
}

/// Handler for platform webhooks.
///
/// Verification comes first; an unauthenticated payload is never
/// inspected. No local state changes in response to events.
pub struct HandleAccountWebhookHandler {
    platform: Arc<dyn ConnectPlatform>,
}

impl HandleAccountWebhookHandler {
    pub fn new(platform: Arc<dyn ConnectPlatform>) -> Self {
        Self { platform }
    }

    pub async fn handle(
        &self,
        cmd: HandleAccountWebhookCommand,
    ) -> Result<WebhookOutcome, OnboardingError> {
        // 1. Verify webhook signature and parse event
        let event = self
            .platform
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook signature verification failed");
                OnboardingError::InvalidSignature
            })?;

        // 2. Dispatch on type
        match event.event_type {
            PlatformEventType::AccountUpdated => {
                let account_id = event.account.as_ref().map(|a| a.id.clone());
                match &event.account {
                    Some(account) => tracing::info!(
                        event_id = %event.id,
                        account_id = %account.id,
                        currently_due = ?account.requirements.currently_due,
                        eventually_due = ?account.requirements.eventually_due,
                        "Account updated"
                    ),
                    None => tracing::info!(event_id = %event.id, "Account updated without snapshot"),
                }
                Ok(WebhookOutcome::AccountUpdated { account_id })
            }
            PlatformEventType::Unknown(event_type) => {
                tracing::debug!(event_id = %event.id, %event_type, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }
}
