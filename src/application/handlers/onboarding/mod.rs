//! Onboarding handlers.
//!
//! Command and query handlers for the connected-account onboarding flow:
//!
//! ## Commands
//! - Creating connected accounts
//! - Issuing (and re-issuing) hosted onboarding links
//! - Starting onboarding end to end (create + link)
//! - Processing account webhooks
//!
//! ## Queries
//! - Checking onboarding completion

mod check_completion;
mod create_account;
mod handle_account_webhook;
mod issue_onboarding_link;
mod start_onboarding;

use crate::domain::onboarding::{AccountId, OnboardingError};
use crate::ports::{PlatformError, PlatformErrorCode};

// Commands
pub use create_account::{CreateAccountCommand, CreateAccountHandler, CreateAccountResult};
pub use handle_account_webhook::{
    HandleAccountWebhookCommand, HandleAccountWebhookHandler, WebhookOutcome,
};
pub use issue_onboarding_link::{
    IssueOnboardingLinkCommand, IssueOnboardingLinkHandler, IssueOnboardingLinkResult,
};
pub use start_onboarding::{StartOnboardingCommand, StartOnboardingHandler, StartOnboardingResult};

// Queries
pub use check_completion::{CheckCompletionHandler, CheckCompletionQuery, CheckCompletionResult};

/// Map a platform failure during account creation.
pub(crate) fn creation_failure(err: PlatformError) -> OnboardingError {
    match err.code {
        PlatformErrorCode::InvalidRequest => OnboardingError::invalid_profile(err.message),
        _ => OnboardingError::platform_unavailable(err.to_string()),
    }
}

/// Map a platform failure on an operation against an existing account.
pub(crate) fn account_failure(err: PlatformError, account_id: &AccountId) -> OnboardingError {
    match err.code {
        PlatformErrorCode::NotFound | PlatformErrorCode::InvalidRequest => {
            OnboardingError::account_not_found(account_id.as_str())
        }
        PlatformErrorCode::InvalidWebhook => OnboardingError::InvalidSignature,
        _ => OnboardingError::platform_unavailable(err.to_string()),
    }
}
