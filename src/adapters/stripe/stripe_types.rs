//! Stripe wire types for Connect onboarding.
//!
//! These types mirror Stripe JSON as it arrives from the REST API and in
//! webhook payloads, and convert into domain types at the adapter edge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::onboarding::{
    AccountId, BusinessProfile, Capability, CollectionFields, ConnectedAccount, LinkPurpose,
    OnboardingLink, Requirements,
};
use crate::ports::PlatformError;

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureParseError {
    #[error("Missing Stripe-Signature header")]
    MissingHeader,
    #[error("Missing timestamp (t=) in signature")]
    MissingTimestamp,
    #[error("Missing v1 signature in header")]
    MissingV1Signature,
    #[error("Invalid timestamp format")]
    InvalidTimestamp,
    #[error("Invalid signature format (not valid hex)")]
    InvalidSignatureFormat,
    #[error("Malformed signature element: {0}")]
    MalformedElement(String),
}

/// Parsed Stripe-Signature header.
///
/// Format: `t=<timestamp>,v1=<sig>[,v1=<sig>...][,v0=<legacy>]`. Several `v1`
/// entries appear while a signing secret is being rolled; any one matching is
/// enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe signed the payload.
    pub timestamp: i64,

    /// HMAC-SHA256 signatures, hex-decoded.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for element in header.split(',') {
            let (key, value) = element
                .split_once('=')
                .ok_or_else(|| SignatureParseError::MalformedElement(element.trim().to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => v1_signatures
                    .push(hex_decode(value).ok_or(SignatureParseError::InvalidSignatureFormat)?),
                // v0 and future schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Encode bytes to hex string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Event Envelope
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g. "account.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,

    /// Connected account the event originated from (Connect webhooks).
    pub account: Option<String>,

    /// Stripe API version used for this event.
    pub api_version: Option<String>,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,

    /// Previous values for updated fields (on update events).
    pub previous_attributes: Option<serde_json::Value>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Connect Objects
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Account object (subset used for onboarding).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeAccount {
    /// Account identifier (acct_...).
    pub id: String,

    pub email: Option<String>,

    #[serde(default)]
    pub business_profile: Option<StripeBusinessProfile>,

    /// Capability name → status (`active`, `inactive`, `pending`).
    #[serde(default)]
    pub capabilities: HashMap<String, String>,

    #[serde(default)]
    pub requirements: Option<StripeRequirements>,

    #[serde(default)]
    pub details_submitted: bool,

    #[serde(default)]
    pub charges_enabled: bool,

    #[serde(default)]
    pub payouts_enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeBusinessProfile {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Requirement lists as Stripe reports them. Lists may be `null`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeRequirements {
    #[serde(default)]
    pub currently_due: Option<Vec<String>>,
    #[serde(default)]
    pub eventually_due: Option<Vec<String>>,
    #[serde(default)]
    pub past_due: Option<Vec<String>>,
    pub disabled_reason: Option<String>,
}

impl StripeAccount {
    /// Convert into the domain snapshot.
    pub fn into_domain(self) -> Result<ConnectedAccount, PlatformError> {
        let id = AccountId::new(self.id).map_err(|e| {
            PlatformError::invalid_request(format!("Stripe returned an unusable account id: {}", e))
        })?;

        let mut capabilities: Vec<Capability> =
            self.capabilities.into_keys().map(Capability::from).collect();
        capabilities.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let requirements = self.requirements.unwrap_or_default();
        let business_profile = self.business_profile.unwrap_or_default();

        Ok(ConnectedAccount {
            id,
            email: self.email,
            business_profile: BusinessProfile {
                name: business_profile.name,
                url: business_profile.url,
            },
            capabilities,
            requirements: Requirements {
                currently_due: requirements.currently_due.unwrap_or_default(),
                eventually_due: requirements.eventually_due.unwrap_or_default(),
            },
            details_submitted: self.details_submitted,
            charges_enabled: self.charges_enabled,
            payouts_enabled: self.payouts_enabled,
        })
    }
}

/// Stripe AccountLink object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeAccountLink {
    pub url: String,
    pub created: i64,
    pub expires_at: i64,
}

impl StripeAccountLink {
    /// Attach the request context Stripe does not echo back.
    pub fn into_domain(
        self,
        account_id: AccountId,
        purpose: LinkPurpose,
        collect: CollectionFields,
        refresh_url: String,
        return_url: String,
    ) -> OnboardingLink {
        OnboardingLink {
            url: self.url,
            account_id,
            purpose,
            collect,
            refresh_url,
            return_url,
            created_at: self.created,
            expires_at: self.expires_at,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Envelope
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe error body: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub param: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_signature_header() {
        let header = SignatureHeader::parse("t=1704067200,v1=abcd,v0=ff").unwrap();
        assert_eq!(header.timestamp, 1704067200);
        assert_eq!(header.v1_signatures, vec![vec![0xab, 0xcd]]);
    }

    #[test]
    fn parse_signature_header_with_rolled_secrets() {
        let header = SignatureHeader::parse("t=1,v1=00ff,v1=ff00").unwrap();
        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_signature_header_errors() {
        assert_eq!(
            SignatureHeader::parse(""),
            Err(SignatureParseError::MissingHeader)
        );
        assert_eq!(
            SignatureHeader::parse("v1=abcd"),
            Err(SignatureParseError::MissingTimestamp)
        );
        assert_eq!(
            SignatureHeader::parse("t=1704067200"),
            Err(SignatureParseError::MissingV1Signature)
        );
        assert_eq!(
            SignatureHeader::parse("t=yesterday,v1=abcd"),
            Err(SignatureParseError::InvalidTimestamp)
        );
        assert_eq!(
            SignatureHeader::parse("t=1,v1=xyz"),
            Err(SignatureParseError::InvalidSignatureFormat)
        );
        assert!(matches!(
            SignatureHeader::parse("garbage"),
            Err(SignatureParseError::MalformedElement(_))
        ));
    }

    #[test]
    fn hex_round_trip() {
        let bytes = [0u8, 1, 127, 255];
        assert_eq!(hex_decode(&hex_encode(&bytes)), Some(bytes.to_vec()));
        assert_eq!(hex_decode("abc"), None);
    }

    #[test]
    fn account_into_domain_keeps_requirement_order() {
        let json = r#"{
            "id": "acct_123",
            "object": "account",
            "email": "a@b.com",
            "business_profile": {"name": "Acme", "url": "https://acme.test"},
            "capabilities": {"transfers": "inactive", "card_payments": "inactive"},
            "requirements": {
                "currently_due": ["individual.id_number", "business_type"],
                "eventually_due": ["individual.id_number", "business_type", "external_account"],
                "past_due": [],
                "disabled_reason": "requirements.past_due"
            },
            "details_submitted": false,
            "charges_enabled": false,
            "payouts_enabled": false
        }"#;

        let account: StripeAccount = serde_json::from_str(json).unwrap();
        let account = account.into_domain().unwrap();

        assert_eq!(account.id.as_str(), "acct_123");
        assert_eq!(account.business_profile.name.as_deref(), Some("Acme"));
        assert_eq!(
            account.capabilities,
            vec![Capability::CardPayments, Capability::Transfers]
        );
        assert_eq!(
            account.requirements.currently_due,
            vec!["individual.id_number", "business_type"]
        );
        assert_eq!(account.requirements.eventually_due.len(), 3);
    }

    #[test]
    fn account_with_null_requirements_is_verified() {
        let json = r#"{"id": "acct_9", "requirements": {"currently_due": null, "eventually_due": null}}"#;
        let account: StripeAccount = serde_json::from_str(json).unwrap();
        assert!(account.into_domain().unwrap().is_fully_verified());
    }

    #[test]
    fn account_without_id_is_rejected() {
        let json = r#"{"id": ""}"#;
        let account: StripeAccount = serde_json::from_str(json).unwrap();
        assert!(account.into_domain().is_err());
    }

    #[test]
    fn non_account_object_is_rejected() {
        let json = r#"{"id": "cus_123", "object": "customer"}"#;
        let account: StripeAccount = serde_json::from_str(json).unwrap();
        assert!(account.into_domain().is_err());
    }

    #[test]
    fn parse_error_envelope() {
        let json = r#"{"error": {"type": "invalid_request_error", "code": "email_invalid", "message": "Invalid email address", "param": "email"}}"#;
        let body: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.code.as_deref(), Some("email_invalid"));
        assert_eq!(body.error.param.as_deref(), Some("email"));
    }
}
