//! Axum router configuration for onboarding endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    handle_stripe_webhook, health, index, refresh_link, return_status, start_onboarding,
    OnboardingAppState,
};

/// Create the onboarding router.
///
/// # Routes
///
/// ## Partner Endpoints
/// - `GET /` - Informational page
/// - `GET /health` - Liveness check
/// - `POST /stripe/onboard` - Create account, bind session, redirect to onboarding
/// - `GET /stripe/refresh` - Redirect to a freshly minted onboarding link
/// - `GET /stripe/return` - Completion status page
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /stripe/webhook` - Handle Stripe webhooks
pub fn onboarding_router() -> Router<OnboardingAppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/stripe/onboard", post(start_onboarding))
        .route("/stripe/refresh", get(refresh_link))
        .route("/stripe/return", get(return_status))
        .route("/stripe/webhook", post(handle_stripe_webhook))
}

/// Router with state applied, ready to serve or to layer.
pub fn onboarding_app(state: OnboardingAppState) -> Router {
    onboarding_router().with_state(state)
}
