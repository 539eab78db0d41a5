//! Payment configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Account types Stripe Connect accepts for `type` on account creation.
const ACCOUNT_TYPES: [&str; 3] = ["standard", "express", "custom"];

/// Payment configuration (Stripe Connect)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret. Empty means every webhook is rejected.
    #[serde(default)]
    pub stripe_webhook_secret: String,

    /// Base URL of the Stripe REST API
    #[serde(default = "default_api_base")]
    pub stripe_api_base: String,

    /// Connected account type (standard, express or custom)
    #[serde(default = "default_account_type")]
    pub stripe_account_type: String,

    /// Per-request timeout for Stripe calls, in seconds
    #[serde(default = "default_timeout")]
    pub stripe_timeout_secs: u64,

    /// Retries after the first attempt for transient Stripe failures
    #[serde(default = "default_max_retries")]
    pub stripe_max_retries: u32,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_live_")
    }

    /// Per-request timeout for Stripe calls
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.stripe_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }

        // Verify key prefixes for safety
        if !self.stripe_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.is_empty()
            && !self.stripe_webhook_secret.starts_with("whsec_")
        {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if !ACCOUNT_TYPES.contains(&self.stripe_account_type.as_str()) {
            return Err(ValidationError::InvalidAccountType(
                self.stripe_account_type.clone(),
            ));
        }
        if self.stripe_timeout_secs == 0 || self.stripe_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.stripe_max_retries > 5 {
            return Err(ValidationError::TooManyRetries);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: String::new(),
            stripe_webhook_secret: String::new(),
            stripe_api_base: default_api_base(),
            stripe_account_type: default_account_type(),
            stripe_timeout_secs: default_timeout(),
            stripe_max_retries: default_max_retries(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_account_type() -> String {
    "standard".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}
