//! Partner defaults and onboarding callback URLs

use serde::Deserialize;

use super::error::ValidationError;

/// Fallback values used when an onboarding request leaves profile fields out,
/// plus the URLs Stripe redirects the partner back to.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerConfig {
    /// Email pre-filled on new connected accounts
    #[serde(default = "default_email")]
    pub partner_email: String,

    /// Business name pre-filled on new connected accounts
    #[serde(default = "default_business_name")]
    pub partner_business_name: String,

    /// Business website pre-filled on new connected accounts
    #[serde(default = "default_website_url")]
    pub partner_website_url: String,

    /// Where Stripe sends the partner when a link expires
    #[serde(default = "default_refresh_url")]
    pub refresh_url: String,

    /// Where Stripe sends the partner after leaving the hosted flow
    #[serde(default = "default_return_url")]
    pub return_url: String,
}

impl PartnerConfig {
    /// Validate partner configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_url("REFRESH_URL", &self.refresh_url)?;
        check_url("RETURN_URL", &self.return_url)?;
        check_url("PARTNER_WEBSITE_URL", &self.partner_website_url)?;
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            partner_email: default_email(),
            partner_business_name: default_business_name(),
            partner_website_url: default_website_url(),
            refresh_url: default_refresh_url(),
            return_url: default_return_url(),
        }
    }
}

fn default_email() -> String {
    "partner@example.com".to_string()
}

fn default_business_name() -> String {
    "Partner Business Name".to_string()
}

fn default_website_url() -> String {
    "https://partner-website.com".to_string()
}

fn default_refresh_url() -> String {
    "http://localhost:3000/stripe/refresh".to_string()
}

fn default_return_url() -> String {
    "http://localhost:3000/stripe/return".to_string()
}
