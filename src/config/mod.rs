//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Keys are un-prefixed so the variables the
//! onboarding script has always used (`STRIPE_SECRET_KEY`, `PARTNER_EMAIL`,
//! `REFRESH_URL`, `PORT`, ...) keep working unchanged.
//!
//! # Example
//!
//! ```no_run
//! use partner_onboarding::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod partner;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use partner::PartnerConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

/// Root application configuration
///
/// Every section reads from the same flat key space. Load using
/// [`AppConfig::load()`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration (bind address, port, environment, logging)
    pub server: ServerConfig,

    /// Stripe API configuration
    pub payment: PaymentConfig,

    /// Partner defaults and onboarding callback URLs
    pub partner: PartnerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads all environment variables (keys are lowercased)
    /// 3. Deserializes each typed section from the same source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let source = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Self::from_source(source)
    }

    /// Build the configuration from an already assembled `config::Config`.
    pub fn from_source(source: config::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            server: source.clone().try_deserialize()?,
            payment: source.clone().try_deserialize()?,
            partner: source.try_deserialize()?,
        })
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.partner.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
