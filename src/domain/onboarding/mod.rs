//! Connected-account onboarding domain.

mod account;
mod completion;
mod errors;
mod event;
mod ids;
mod link;

pub use account::{BusinessProfile, Capability, ConnectedAccount, Requirements};
pub(crate) use account::validate_email;
pub use completion::CompletionStatus;
pub use errors::{OnboardingError, ValidationError};
pub use event::{PlatformEvent, PlatformEventType};
pub use ids::{AccountId, SessionId};
pub use link::{CollectionFields, LinkPurpose, LinkReason, OnboardingLink};
