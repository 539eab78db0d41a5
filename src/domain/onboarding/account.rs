//! Connected account snapshot as observed from the payment platform.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountId, ValidationError};

/// Public business details shown on the connected account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Capability requested for a connected account.
///
/// Tags the service does not know are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    CardPayments,
    Transfers,
    Other(String),
}

impl Capability {
    /// The platform's tag for this capability.
    pub fn as_str(&self) -> &str {
        match self {
            Capability::CardPayments => "card_payments",
            Capability::Transfers => "transfers",
            Capability::Other(tag) => tag,
        }
    }

    /// Capabilities requested when the caller does not choose any.
    pub fn defaults() -> Vec<Capability> {
        vec![Capability::CardPayments, Capability::Transfers]
    }
}

impl From<String> for Capability {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "card_payments" => Capability::CardPayments,
            "transfers" => Capability::Transfers,
            _ => Capability::Other(tag),
        }
    }
}

impl From<Capability> for String {
    fn from(capability: Capability) -> Self {
        capability.as_str().to_string()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outstanding verification requirements, in the order the platform lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub currently_due: Vec<String>,
    #[serde(default)]
    pub eventually_due: Vec<String>,
}

impl Requirements {
    /// Both requirement lists are empty.
    pub fn is_empty(&self) -> bool {
        self.currently_due.is_empty() && self.eventually_due.is_empty()
    }
}

/// A merchant registered on the payment platform.
///
/// Only the platform mutates an account; the service reads fresh snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub id: AccountId,
    pub email: Option<String>,
    pub business_profile: BusinessProfile,
    pub capabilities: Vec<Capability>,
    pub requirements: Requirements,
    pub details_submitted: bool,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
}

impl ConnectedAccount {
    /// Fully verified as far as onboarding is concerned.
    pub fn is_fully_verified(&self) -> bool {
        self.requirements.is_empty()
    }
}

/// Light sanity check on an email before it is sent to the platform.
pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::invalid_format(
            "email",
            "expected local@domain",
        )),
    }
}
