//! Onboarding error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MissingAccountId | 400 |
//! | InvalidSignature | 400 |
//! | InvalidProfile | 400 |
//! | AccountNotFound | 500 |
//! | PlatformUnavailable | 500 |

use thiserror::Error;

/// Field-level validation failures for domain value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the onboarding coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    /// No account identifier could be resolved for the request.
    #[error("Account ID not found")]
    MissingAccountId,

    /// The platform reports no such account.
    #[error("Connected account not found: {0}")]
    AccountNotFound(String),

    /// The platform rejected the account-creation payload.
    #[error("Invalid partner profile: {0}")]
    InvalidProfile(String),

    /// Network failure, timeout or platform-side error.
    #[error("Payment platform unavailable: {0}")]
    PlatformUnavailable(String),

    /// Webhook authenticity check failed.
    #[error("Webhook signature verification failed")]
    InvalidSignature,
}

impl OnboardingError {
    pub fn account_not_found(account_id: impl Into<String>) -> Self {
        OnboardingError::AccountNotFound(account_id.into())
    }

    pub fn invalid_profile(reason: impl Into<String>) -> Self {
        OnboardingError::InvalidProfile(reason.into())
    }

    pub fn platform_unavailable(reason: impl Into<String>) -> Self {
        OnboardingError::PlatformUnavailable(reason.into())
    }

    /// Whether the caller can fix the request (missing id, bad signature,
    /// bad profile) as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OnboardingError::MissingAccountId
                | OnboardingError::InvalidSignature
                | OnboardingError::InvalidProfile(_)
        )
    }
}

impl From<ValidationError> for OnboardingError {
    fn from(err: ValidationError) -> Self {
        OnboardingError::InvalidProfile(err.to_string())
    }
}
