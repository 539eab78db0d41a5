//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod onboarding;

pub use onboarding::{
    CheckCompletionHandler, CheckCompletionQuery, CheckCompletionResult, CreateAccountCommand,
    CreateAccountHandler, CreateAccountResult, HandleAccountWebhookCommand,
    HandleAccountWebhookHandler, IssueOnboardingLinkCommand, IssueOnboardingLinkHandler,
    IssueOnboardingLinkResult, StartOnboardingCommand, StartOnboardingHandler,
    StartOnboardingResult, WebhookOutcome,
};
