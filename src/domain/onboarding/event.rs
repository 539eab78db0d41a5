//! Verified asynchronous notifications from the payment platform.

use serde::{Deserialize, Serialize};

use super::ConnectedAccount;

/// Event types the service distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformEventType {
    /// `account.updated`
    AccountUpdated,

    /// Anything else; acknowledged and ignored.
    Unknown(String),
}

impl PlatformEventType {
    pub fn from_wire(event_type: &str) -> Self {
        match event_type {
            "account.updated" => PlatformEventType::AccountUpdated,
            other => PlatformEventType::Unknown(other.to_string()),
        }
    }
}

/// An event whose signature has already been checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub id: String,
    pub event_type: PlatformEventType,
    /// Unix seconds.
    pub created: i64,
    pub livemode: bool,
    /// Present for `account.updated`.
    pub account: Option<ConnectedAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_account_updated() {
        assert_eq!(
            PlatformEventType::from_wire("account.updated"),
            PlatformEventType::AccountUpdated
        );
    }

    #[test]
    fn keeps_unknown_type_name() {
        assert_eq!(
            PlatformEventType::from_wire("payout.paid"),
            PlatformEventType::Unknown("payout.paid".to_string())
        );
    }
}
