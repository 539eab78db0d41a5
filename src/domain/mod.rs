//! Domain layer - connected-account onboarding concepts.
//!
//! The payment platform owns account verification. This layer only models
//! what the service observes: identifiers, profiles, requirement snapshots,
//! onboarding links and the errors the coordinator surfaces.

pub mod onboarding;
