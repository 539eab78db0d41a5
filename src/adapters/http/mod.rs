//! HTTP adapters - REST API implementations.

pub mod onboarding;

// Re-export key types for convenience
pub use onboarding::{onboarding_app, onboarding_router, OnboardingAppState};
