//! Mock Connect platform for testing.
//!
//! Provides a configurable in-memory implementation of `ConnectPlatform` for
//! unit and integration tests. Supports:
//! - An account "database" with adjustable requirements
//! - Error injection
//! - Call tracking
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::onboarding::{
    AccountId, BusinessProfile, ConnectedAccount, OnboardingLink, PlatformEvent, PlatformEventType,
    Requirements,
};
use crate::ports::{
    ConnectPlatform, CreateAccountLinkRequest, CreateAccountRequest, PlatformError,
};

/// Lifetime of mock onboarding links, matching Stripe's five minutes.
const LINK_TTL_SECS: i64 = 300;

/// Mock Connect platform for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockConnectPlatform::new();
/// mock.add_account_with_requirements("acct_123", vec!["individual.id_number".into()], vec![]);
///
/// mock.set_method_error("retrieve_account", PlatformError::network("down"));
/// ```
#[derive(Default)]
pub struct MockConnectPlatform {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Known accounts by ID.
    accounts: HashMap<String, ConnectedAccount>,

    /// Requirements new accounts start with.
    initial_requirements: Requirements,

    /// ID handed to the next created account.
    next_account_id: Option<String>,

    /// Links minted so far; makes every URL unique.
    links_issued: u64,

    /// Next webhook event to return.
    next_webhook_event: Option<PlatformEvent>,

    /// Error to return on next call.
    next_error: Option<PlatformError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PlatformError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Webhook verification behavior.
    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any payload and return configured event.
    #[default]
    AcceptAll,

    /// Accept only this exact signature header.
    RequireSignature(String),

    /// Always fail verification.
    AlwaysFail,
}

impl MockConnectPlatform {
    /// Create a new mock platform with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that only accepts one signature header value.
    pub fn requiring_signature(signature: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode =
            WebhookVerifyMode::RequireSignature(signature.into());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the ID the next `create_account` call returns.
    pub fn set_next_account_id(&self, id: impl Into<String>) {
        self.inner.lock().unwrap().next_account_id = Some(id.into());
    }

    /// Requirements that newly created accounts start with.
    pub fn set_initial_requirements(&self, requirements: Requirements) {
        self.inner.lock().unwrap().initial_requirements = requirements;
    }

    /// Add an account to the "database".
    pub fn add_account(&self, account: ConnectedAccount) {
        let id = account.id.as_str().to_string();
        self.inner.lock().unwrap().accounts.insert(id, account);
    }

    /// Add a bare account with the given requirement lists.
    pub fn add_account_with_requirements(
        &self,
        id: &str,
        currently_due: Vec<String>,
        eventually_due: Vec<String>,
    ) {
        self.add_account(Self::account(
            id,
            Requirements {
                currently_due,
                eventually_due,
            },
        ));
    }

    /// Replace the requirement lists of a known account.
    pub fn set_requirements(&self, id: &str, requirements: Requirements) {
        if let Some(account) = self.inner.lock().unwrap().accounts.get_mut(id) {
            account.requirements = requirements;
        }
    }

    /// Set the webhook event to return on verification.
    pub fn set_webhook_event(&self, event: PlatformEvent) {
        self.inner.lock().unwrap().next_webhook_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PlatformError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PlatformError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Total number of platform calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PlatformError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn account(id: &str, requirements: Requirements) -> ConnectedAccount {
        ConnectedAccount {
            id: AccountId::new(id).unwrap(),
            email: None,
            business_profile: BusinessProfile::default(),
            capabilities: Vec::new(),
            details_submitted: requirements.is_empty(),
            charges_enabled: requirements.is_empty(),
            payouts_enabled: requirements.is_empty(),
            requirements,
        }
    }
}

impl Clone for MockConnectPlatform {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl ConnectPlatform for MockConnectPlatform {
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<ConnectedAccount, PlatformError> {
        self.record_call(
            "create_account",
            vec![request.email.clone(), request.business_name.clone()],
        );
        self.check_error("create_account")?;

        let mut state = self.inner.lock().unwrap();

        let id = state.next_account_id.take().unwrap_or_else(|| {
            format!("acct_mock_{}", uuid::Uuid::new_v4().simple())
        });
        let mut account = Self::account(&id, state.initial_requirements.clone());
        account.email = Some(request.email);
        account.business_profile = BusinessProfile {
            name: Some(request.business_name),
            url: Some(request.website_url),
        };
        account.capabilities = request.capabilities;

        // Store for later retrieval
        state.accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn create_account_link(
        &self,
        request: CreateAccountLinkRequest,
    ) -> Result<OnboardingLink, PlatformError> {
        self.record_call(
            "create_account_link",
            vec![
                request.account_id.to_string(),
                request.refresh_url.clone(),
                request.return_url.clone(),
            ],
        );
        self.check_error("create_account_link")?;

        let mut state = self.inner.lock().unwrap();

        if !state.accounts.contains_key(request.account_id.as_str()) {
            return Err(PlatformError::not_found("Account"));
        }

        state.links_issued += 1;
        let now = chrono::Utc::now().timestamp();

        Ok(OnboardingLink {
            url: format!(
                "https://connect.stripe.com/setup/s/{}/{}",
                request.account_id, state.links_issued
            ),
            account_id: request.account_id,
            purpose: request.purpose,
            collect: request.collect,
            refresh_url: request.refresh_url,
            return_url: request.return_url,
            created_at: now,
            expires_at: now + LINK_TTL_SECS,
        })
    }

    async fn retrieve_account(
        &self,
        account_id: &AccountId,
    ) -> Result<ConnectedAccount, PlatformError> {
        self.record_call("retrieve_account", vec![account_id.to_string()]);
        self.check_error("retrieve_account")?;

        let state = self.inner.lock().unwrap();
        state
            .accounts
            .get(account_id.as_str())
            .cloned()
            .ok_or_else(|| PlatformError::not_found("Account"))
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PlatformEvent, PlatformError> {
        self.record_call(
            "verify_webhook",
            vec![
                String::from_utf8_lossy(payload).chars().take(50).collect(),
                signature.chars().take(20).collect(),
            ],
        );
        self.check_error("verify_webhook")?;

        let state = self.inner.lock().unwrap();

        // Check verification mode
        match &state.webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(required) => {
                if signature != required {
                    return Err(PlatformError::invalid_webhook("Invalid signature"));
                }
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(PlatformError::invalid_webhook("Verification disabled"));
            }
        }

        // Return configured event or parse from payload
        if let Some(event) = &state.next_webhook_event {
            return Ok(event.clone());
        }

        let parsed: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| PlatformError::invalid_webhook(e.to_string()))?;

        let event_type = PlatformEventType::from_wire(parsed["type"].as_str().unwrap_or("unknown"));
        let account = match (&event_type, parsed["data"]["object"]["id"].as_str()) {
            (PlatformEventType::AccountUpdated, Some(id)) => state.accounts.get(id).cloned(),
            _ => None,
        };

        Ok(PlatformEvent {
            id: parsed["id"].as_str().unwrap_or("evt_mock").to_string(),
            event_type,
            created: parsed["created"]
                .as_i64()
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
            livemode: parsed["livemode"].as_bool().unwrap_or(false),
            account,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockConnectPlatform {
    /// Create a mock that already knows one account.
    pub fn with_account(id: &str, currently_due: Vec<String>, eventually_due: Vec<String>) -> Self {
        let mock = Self::new();
        mock.add_account_with_requirements(id, currently_due, eventually_due);
        mock
    }

    /// Build an `account.updated` event for a known account.
    pub fn account_updated_event(account: ConnectedAccount) -> PlatformEvent {
        PlatformEvent {
            id: format!("evt_acct_{}", uuid::Uuid::new_v4().simple()),
            event_type: PlatformEventType::AccountUpdated,
            created: chrono::Utc::now().timestamp(),
            livemode: false,
            account: Some(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::{Capability, CollectionFields, LinkPurpose};
    use crate::ports::PlatformErrorCode;

    fn create_request(email: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            email: email.to_string(),
            business_name: "Acme".to_string(),
            website_url: "https://acme.test".to_string(),
            capabilities: Capability::defaults(),
            idempotency_key: None,
        }
    }

    fn link_request(account_id: &str) -> CreateAccountLinkRequest {
        CreateAccountLinkRequest {
            account_id: AccountId::new(account_id).unwrap(),
            refresh_url: "http://localhost:3000/stripe/refresh".to_string(),
            return_url: "http://localhost:3000/stripe/return".to_string(),
            purpose: LinkPurpose::AccountOnboarding,
            collect: CollectionFields::EventuallyDue,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Basic Operation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_account_returns_mock_account() {
        let mock = MockConnectPlatform::new();

        let account = mock.create_account(create_request("a@b.com")).await.unwrap();

        assert!(account.id.as_str().starts_with("acct_mock_"));
        assert_eq!(account.email.as_deref(), Some("a@b.com"));
        assert_eq!(account.capabilities, Capability::defaults());
    }

    #[tokio::test]
    async fn retrieve_after_create() {
        let mock = MockConnectPlatform::new();
        mock.set_next_account_id("acct_123");

        let created = mock.create_account(create_request("a@b.com")).await.unwrap();
        let fetched = mock.retrieve_account(&created.id).await.unwrap();

        assert_eq!(fetched.id.as_str(), "acct_123");
    }

    #[tokio::test]
    async fn retrieve_unknown_account_is_not_found() {
        let mock = MockConnectPlatform::new();
        let err = mock
            .retrieve_account(&AccountId::new("acct_missing").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, PlatformErrorCode::NotFound);
    }

    #[tokio::test]
    async fn links_are_never_reused() {
        let mock = MockConnectPlatform::with_account("acct_123", vec![], vec![]);

        let first = mock.create_account_link(link_request("acct_123")).await.unwrap();
        let second = mock.create_account_link(link_request("acct_123")).await.unwrap();

        assert_ne!(first.url, second.url);
        assert_eq!(second.expires_at - second.created_at, LINK_TTL_SECS);
    }

    #[tokio::test]
    async fn set_requirements_changes_snapshot() {
        let mock = MockConnectPlatform::with_account("acct_123", vec!["x".to_string()], vec![]);
        mock.set_requirements("acct_123", Requirements::default());

        let account = mock
            .retrieve_account(&AccountId::new("acct_123").unwrap())
            .await
            .unwrap();
        assert!(account.is_fully_verified());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Injection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn set_error_is_consumed_once() {
        let mock = MockConnectPlatform::new();
        mock.set_error(PlatformError::network("down"));

        assert!(mock.create_account(create_request("a@b.com")).await.is_err());
        assert!(mock.create_account(create_request("a@b.com")).await.is_ok());
    }

    #[tokio::test]
    async fn set_method_error_only_affects_method() {
        let mock = MockConnectPlatform::with_account("acct_123", vec![], vec![]);
        mock.set_method_error("create_account_link", PlatformError::timeout("slow"));

        let id = AccountId::new("acct_123").unwrap();
        assert!(mock.retrieve_account(&id).await.is_ok());
        assert!(mock.create_account_link(link_request("acct_123")).await.is_err());

        mock.clear_errors();
        assert!(mock.create_account_link(link_request("acct_123")).await.is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn tracks_method_calls() {
        let mock = MockConnectPlatform::new();
        mock.create_account(create_request("tracked@example.com"))
            .await
            .unwrap();

        assert!(mock.was_called("create_account"));
        assert_eq!(mock.call_count("create_account"), 1);
        assert!(!mock.was_called("create_account_link"));
        assert!(mock.calls()[0]
            .args
            .contains(&"tracked@example.com".to_string()));
        assert_eq!(mock.total_calls(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_returns_configured_event() {
        let mock = MockConnectPlatform::new();
        let event = MockConnectPlatform::account_updated_event(MockConnectPlatform::account(
            "acct_1",
            Requirements::default(),
        ));
        mock.set_webhook_event(event.clone());

        let result = mock.verify_webhook(b"{}", "signature").await.unwrap();

        assert_eq!(result, event);
    }

    #[tokio::test]
    async fn verify_webhook_parses_payload_when_no_event_set() {
        let mock = MockConnectPlatform::with_account("acct_1", vec![], vec![]);
        let payload = r#"{"id": "evt_test", "type": "account.updated", "created": 1704067200, "data": {"object": {"id": "acct_1"}}}"#;

        let event = mock.verify_webhook(payload.as_bytes(), "sig").await.unwrap();

        assert_eq!(event.id, "evt_test");
        assert_eq!(event.event_type, PlatformEventType::AccountUpdated);
        assert_eq!(event.account.unwrap().id.as_str(), "acct_1");
    }

    #[tokio::test]
    async fn rejecting_webhooks_fails_verification() {
        let mock = MockConnectPlatform::rejecting_webhooks();
        let err = mock.verify_webhook(b"{}", "signature").await.unwrap_err();
        assert_eq!(err.code, PlatformErrorCode::InvalidWebhook);
    }

    #[tokio::test]
    async fn requiring_signature_checks_header() {
        let mock = MockConnectPlatform::requiring_signature("t=1,v1=ok");
        assert!(mock.verify_webhook(b"{}", "t=1,v1=bad").await.is_err());
        assert!(mock.verify_webhook(b"{}", "t=1,v1=ok").await.is_ok());
    }
}
