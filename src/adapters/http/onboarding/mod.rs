//! HTTP adapter for onboarding endpoints.
//!
//! Exposes the onboarding flow to partners and to Stripe:
//! - `GET /` - Informational page
//! - `GET /health` - Liveness check
//! - `POST /stripe/onboard` - Create an account and redirect into onboarding
//! - `GET /stripe/refresh` - Reissue an expired onboarding link
//! - `GET /stripe/return` - Report onboarding completion
//! - `POST /stripe/webhook` - Receive signed Stripe events

pub mod dto;
pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::{OnboardingApiError, OnboardingAppState, SESSION_COOKIE};
pub use routes::{onboarding_app, onboarding_router};
