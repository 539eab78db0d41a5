//! Connect platform port for connected-account onboarding.
//!
//! Defines the contract for the payment platform that owns connected
//! accounts (Stripe Connect). Implementations create accounts, mint hosted
//! onboarding links, read account snapshots and authenticate webhooks.
//!
//! # Design
//!
//! - **Platform owns state**: the service never caches or mutates accounts
//! - **No idempotence on links**: every `create_account_link` mints a new URL
//! - **Verification lives here**: callers never see unauthenticated payloads

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::onboarding::{
    AccountId, Capability, CollectionFields, ConnectedAccount, LinkPurpose, OnboardingLink,
    PlatformEvent,
};

/// Port for the connected-account platform.
#[async_trait]
pub trait ConnectPlatform: Send + Sync {
    /// Register a new connected account.
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<ConnectedAccount, PlatformError>;

    /// Mint a fresh hosted onboarding link for an account.
    async fn create_account_link(
        &self,
        request: CreateAccountLinkRequest,
    ) -> Result<OnboardingLink, PlatformError>;

    /// Read the live account snapshot.
    async fn retrieve_account(&self, account_id: &AccountId)
        -> Result<ConnectedAccount, PlatformError>;

    /// Verify a webhook signature and parse the event.
    ///
    /// Returns the parsed event if valid, error if signature invalid.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PlatformEvent, PlatformError>;
}

/// Request to create a connected account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Contact email pre-filled on the account.
    pub email: String,

    /// Public business name.
    pub business_name: String,

    /// Public business website.
    pub website_url: String,

    /// Capabilities to request.
    pub capabilities: Vec<Capability>,

    /// Idempotency key so retried creates never produce two accounts.
    pub idempotency_key: Option<String>,
}

/// Request to create an onboarding link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountLinkRequest {
    pub account_id: AccountId,
    pub refresh_url: String,
    pub return_url: String,
    pub purpose: LinkPurpose,
    pub collect: CollectionFields,
}

/// Errors from platform operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformError {
    /// Error code for categorization.
    pub code: PlatformErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Platform's own error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PlatformError {
    /// Create a new platform error.
    pub fn new(code: PlatformErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the platform's error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorCode::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorCode::Timeout, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PlatformErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorCode::InvalidRequest, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorCode::InvalidWebhook, message)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PlatformError {}

/// Platform error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Request or overall deadline exceeded.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Platform rejected the parameters.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Platform-side failure (5xx) or unparseable response.
    ProviderError,
}

impl PlatformErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlatformErrorCode::NetworkError
                | PlatformErrorCode::Timeout
                | PlatformErrorCode::RateLimitExceeded
                | PlatformErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PlatformErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlatformErrorCode::NetworkError => "network_error",
            PlatformErrorCode::Timeout => "timeout",
            PlatformErrorCode::AuthenticationError => "authentication_error",
            PlatformErrorCode::NotFound => "not_found",
            PlatformErrorCode::InvalidRequest => "invalid_request",
            PlatformErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PlatformErrorCode::InvalidWebhook => "invalid_webhook",
            PlatformErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
