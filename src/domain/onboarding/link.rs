//! Hosted onboarding links.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AccountId;

/// What the link is for. Only onboarding links are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPurpose {
    AccountOnboarding,
}

impl LinkPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPurpose::AccountOnboarding => "account_onboarding",
        }
    }
}

/// Which requirement set the hosted flow collects.
///
/// `EventuallyDue` gathers everything up front; `CurrentlyDue` would only
/// collect the minimal incremental set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionFields {
    CurrentlyDue,
    EventuallyDue,
}

impl CollectionFields {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionFields::CurrentlyDue => "currently_due",
            CollectionFields::EventuallyDue => "eventually_due",
        }
    }
}

/// Why a link is being minted. Logged only; both reasons behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkReason {
    Initial,
    Refresh,
}

impl fmt::Display for LinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkReason::Initial => f.write_str("initial"),
            LinkReason::Refresh => f.write_str("refresh"),
        }
    }
}

/// A short-lived, single-use URL into the platform's hosted onboarding flow.
///
/// Each issuance supersedes the previous one; callers present only the latest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingLink {
    pub url: String,
    pub account_id: AccountId,
    pub purpose: LinkPurpose,
    pub collect: CollectionFields,
    pub refresh_url: String,
    pub return_url: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds; the platform decides the TTL.
    pub expires_at: i64,
}

impl OnboardingLink {
    /// Whether the platform-reported expiry has passed at `now` (unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(expires_at: i64) -> OnboardingLink {
        OnboardingLink {
            url: "https://connect.stripe.com/setup/s/acct_123/abc".to_string(),
            account_id: AccountId::new("acct_123").unwrap(),
            purpose: LinkPurpose::AccountOnboarding,
            collect: CollectionFields::EventuallyDue,
            refresh_url: "http://localhost:3000/stripe/refresh".to_string(),
            return_url: "http://localhost:3000/stripe/return".to_string(),
            created_at: 1_700_000_000,
            expires_at,
        }
    }

    #[test]
    fn wire_tags() {
        assert_eq!(LinkPurpose::AccountOnboarding.as_str(), "account_onboarding");
        assert_eq!(CollectionFields::EventuallyDue.as_str(), "eventually_due");
        assert_eq!(CollectionFields::CurrentlyDue.as_str(), "currently_due");
    }

    #[test]
    fn purpose_serializes_snake_case() {
        let json = serde_json::to_string(&LinkPurpose::AccountOnboarding).unwrap();
        assert_eq!(json, "\"account_onboarding\"");
    }

    #[test]
    fn expiry_is_inclusive() {
        let link = link(1_700_000_300);
        assert!(!link.is_expired_at(1_700_000_299));
        assert!(link.is_expired_at(1_700_000_300));
    }

    #[test]
    fn reason_display() {
        assert_eq!(LinkReason::Initial.to_string(), "initial");
        assert_eq!(LinkReason::Refresh.to_string(), "refresh");
    }
}
