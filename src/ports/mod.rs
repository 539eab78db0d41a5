//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the onboarding coordinator and the outside world. Adapters implement them.
//!
//! - `ConnectPlatform` - Connected-account platform (accounts, links, webhooks)
//! - `SessionStore` - Caller session to account bindings

mod connect_platform;
mod session_store;

pub use connect_platform::{
    ConnectPlatform, CreateAccountLinkRequest, CreateAccountRequest, PlatformError,
    PlatformErrorCode,
};
pub use session_store::{SessionStore, SessionStoreError};
