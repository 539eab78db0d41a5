//! Stripe Connect adapter.
//!
//! Implements the `ConnectPlatform` port for Stripe Connect, including:
//! - Connected account creation
//! - Hosted onboarding links
//! - Account retrieval for completion checks
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `STRIPE_SECRET_KEY`: Stripe secret API key
//! - `STRIPE_WEBHOOK_SECRET`: Webhook signing secret (whsec_...)

mod mock_connect_platform;
mod retry;
mod stripe_adapter;
mod stripe_types;

pub use mock_connect_platform::{MethodCall, MockConnectPlatform};
pub use retry::RetryPolicy;
pub use stripe_adapter::{StripeConfig, StripeConnectAdapter};
pub use stripe_types::{
    hex_encode, SignatureHeader, SignatureParseError, StripeAccount, StripeAccountLink,
    StripeWebhookEvent,
};
