//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for partners and Stripe callbacks
//! - `storage` - Session binding storage
//! - `stripe` - Stripe Connect client and test double

pub mod http;
pub mod storage;
pub mod stripe;

pub use storage::InMemorySessionStore;
pub use stripe::{MockConnectPlatform, StripeConfig, StripeConnectAdapter};
