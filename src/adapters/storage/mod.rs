//! Storage Adapters
//!
//! Implementations of the SessionStore port for remembering which connected
//! account a caller session is onboarding.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Keeps bindings in process memory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemorySessionStore;
//!
//! let sessions = InMemorySessionStore::new();
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
