//! HTTP DTOs for onboarding endpoints.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters carried by the refresh and return callbacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountIdParams {
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Optional partner profile for `POST /stripe/onboard`.
///
/// Missing fields fall back to the configured partner profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Webhook acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookReceivedResponse {
    pub received: bool,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
