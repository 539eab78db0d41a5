//! Stripe Connect adapter.
//!
//! Implements the `ConnectPlatform` trait against the Stripe REST API:
//! account creation, account links, account retrieval and webhook
//! verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripeConnectAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::domain::onboarding::{AccountId, ConnectedAccount, OnboardingLink, PlatformEvent, PlatformEventType};
use crate::ports::{
    ConnectPlatform, CreateAccountLinkRequest, CreateAccountRequest, PlatformError,
    PlatformErrorCode,
};

use super::retry::RetryPolicy;
use super::stripe_types::{
    SignatureHeader, StripeAccount, StripeAccountLink, StripeErrorResponse,
    StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...). Empty rejects every webhook.
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Connected account type sent on creation.
    account_type: String,

    /// Per-request timeout.
    request_timeout: Duration,

    /// Retry policy for transient failures.
    retry: RetryPolicy,

    /// Whether to reject test-mode events.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a new Stripe configuration with defaults.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        let request_timeout = Duration::from_secs(10);
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            account_type: "standard".to_string(),
            request_timeout,
            retry: RetryPolicy::for_request_timeout(request_timeout, 2),
            require_livemode: false,
        }
    }

    /// Build from the loaded application configuration.
    ///
    /// Live keys only accept live-mode events.
    pub fn from_payment_config(payment: &PaymentConfig) -> Self {
        let request_timeout = payment.request_timeout();
        Self {
            api_key: SecretString::new(payment.stripe_secret_key.clone()),
            webhook_secret: SecretString::new(payment.stripe_webhook_secret.clone()),
            api_base_url: payment.stripe_api_base.trim_end_matches('/').to_string(),
            account_type: payment.stripe_account_type.clone(),
            request_timeout,
            retry: RetryPolicy::for_request_timeout(request_timeout, payment.stripe_max_retries),
            require_livemode: payment.is_live_mode(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Require livemode events.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe Connect adapter.
pub struct StripeConnectAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeConnectAdapter {
    /// Create a new adapter; the HTTP client carries the per-request timeout.
    pub fn new(config: StripeConfig) -> Result<Self, PlatformError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PlatformError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
    }

    /// Send one request and decode the JSON body, classifying failures.
    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, PlatformError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::timeout(format!("{} timed out: {}", operation, e))
            } else {
                PlatformError::network(format!("{} failed: {}", operation, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status, &body);
            tracing::error!(
                operation,
                status = status.as_u16(),
                code = %err.code,
                provider_code = err.provider_code.as_deref().unwrap_or(""),
                "Stripe request failed"
            );
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            PlatformError::new(
                PlatformErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Validates timestamp to prevent replay attacks
    fn verify_signature(&self, payload: &[u8], header: &SignatureHeader) -> Result<(), PlatformError> {
        let secret = self.config.webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(PlatformError::invalid_webhook("Webhook secret not configured"));
        }

        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now
            .checked_sub(header.timestamp)
            .ok_or_else(|| PlatformError::invalid_webhook("Event timestamp out of range"))?;

        if age > MAX_TIMESTAMP_AGE_SECS {
            return Err(PlatformError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            return Err(PlatformError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature over "{t}.{payload}"
        let expected = compute_signature(secret.as_bytes(), header.timestamp, payload)?;

        // 3. Constant-time comparison against every v1 candidate
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| expected.as_slice().ct_eq(candidate.as_slice()).into());

        if !matched {
            return Err(PlatformError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Parse a verified payload into a domain event.
    fn parse_event(&self, payload: &[u8]) -> Result<PlatformEvent, PlatformError> {
        parse_event(payload, self.config.require_livemode)
    }
}

/// HMAC-SHA256 over `"{timestamp}.{payload}"`.
pub(super) fn compute_signature(
    secret: &[u8],
    timestamp: i64,
    payload: &[u8],
) -> Result<Vec<u8>, PlatformError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| PlatformError::invalid_webhook(format!("Unusable signing secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Decode a Stripe event envelope into a domain event.
pub(super) fn parse_event(payload: &[u8], require_livemode: bool) -> Result<PlatformEvent, PlatformError> {
    let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| PlatformError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

    if require_livemode && !stripe_event.livemode {
        return Err(PlatformError::invalid_webhook(
            "Test mode events not allowed in live mode",
        ));
    }

    let event_type = PlatformEventType::from_wire(&stripe_event.event_type);
    let account = match event_type {
        PlatformEventType::AccountUpdated => {
            let account: StripeAccount = serde_json::from_value(stripe_event.data.object)
                .map_err(|e| PlatformError::invalid_webhook(format!("Invalid account: {}", e)))?;
            Some(account.into_domain()?)
        }
        PlatformEventType::Unknown(_) => None,
    };

    Ok(PlatformEvent {
        id: stripe_event.id,
        event_type,
        created: stripe_event.created,
        livemode: stripe_event.livemode,
        account,
    })
}

/// Map a non-success Stripe response onto a platform error.
fn error_from_response(status: StatusCode, body: &str) -> PlatformError {
    let detail = serde_json::from_str::<StripeErrorResponse>(body).ok().map(|r| r.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Stripe API error (HTTP {})", status.as_u16()));
    let provider_code = detail.as_ref().and_then(|d| d.code.clone());

    let code = match (status, provider_code.as_deref()) {
        (_, Some("resource_missing")) | (_, Some("account_invalid")) => PlatformErrorCode::NotFound,
        (StatusCode::NOT_FOUND, _) => PlatformErrorCode::NotFound,
        (StatusCode::UNAUTHORIZED, _) | (StatusCode::FORBIDDEN, _) => {
            PlatformErrorCode::AuthenticationError
        }
        (StatusCode::TOO_MANY_REQUESTS, _) => PlatformErrorCode::RateLimitExceeded,
        (s, _) if s.is_server_error() => PlatformErrorCode::ProviderError,
        _ => PlatformErrorCode::InvalidRequest,
    };

    let err = PlatformError::new(code, message);
    match provider_code {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    }
}

/// Form parameters for `POST /v1/accounts`.
fn account_params(request: &CreateAccountRequest, account_type: &str) -> Vec<(String, String)> {
    let mut params = vec![
        ("type".to_string(), account_type.to_string()),
        ("email".to_string(), request.email.clone()),
        ("business_profile[name]".to_string(), request.business_name.clone()),
        ("business_profile[url]".to_string(), request.website_url.clone()),
    ];
    for capability in &request.capabilities {
        params.push((
            format!("capabilities[{}][requested]", capability.as_str()),
            "true".to_string(),
        ));
    }
    params
}

/// Form parameters for `POST /v1/account_links`.
fn link_params(request: &CreateAccountLinkRequest) -> Vec<(&'static str, String)> {
    vec![
        ("account", request.account_id.to_string()),
        ("refresh_url", request.refresh_url.clone()),
        ("return_url", request.return_url.clone()),
        ("type", request.purpose.as_str().to_string()),
        ("collection_options[fields]", request.collect.as_str().to_string()),
    ]
}

#[async_trait]
impl ConnectPlatform for StripeConnectAdapter {
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<ConnectedAccount, PlatformError> {
        let url = self.url("/v1/accounts");
        let params = account_params(&request, &self.config.account_type);

        let account: StripeAccount = self
            .config
            .retry
            .run("create_account", || {
                let mut builder = self.authorized(self.http_client.post(&url)).form(&params);
                if let Some(key) = &request.idempotency_key {
                    builder = builder.header("Idempotency-Key", key.as_str());
                }
                self.send_json("create_account", builder)
            })
            .await?;

        account.into_domain()
    }

    async fn create_account_link(
        &self,
        request: CreateAccountLinkRequest,
    ) -> Result<OnboardingLink, PlatformError> {
        let url = self.url("/v1/account_links");
        let params = link_params(&request);

        let link: StripeAccountLink = self
            .config
            .retry
            .run("create_account_link", || {
                let builder = self.authorized(self.http_client.post(&url)).form(&params);
                self.send_json("create_account_link", builder)
            })
            .await?;

        Ok(link.into_domain(
            request.account_id,
            request.purpose,
            request.collect,
            request.refresh_url,
            request.return_url,
        ))
    }

    async fn retrieve_account(
        &self,
        account_id: &AccountId,
    ) -> Result<ConnectedAccount, PlatformError> {
        let url = self.url(&format!("/v1/accounts/{}", account_id));

        let account: StripeAccount = self
            .config
            .retry
            .run("retrieve_account", || {
                let builder = self.authorized(self.http_client.get(&url));
                self.send_json("retrieve_account", builder)
            })
            .await?;

        account.into_domain()
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PlatformEvent, PlatformError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature)
            .map_err(|e| PlatformError::invalid_webhook(e.to_string()))?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse and convert event
        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            "Webhook signature verified"
        );

        Ok(event)
    }
}
