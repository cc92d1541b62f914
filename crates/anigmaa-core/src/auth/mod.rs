//! Authentication module for managing session credentials.
//!
//! This module provides:
//! - `SessionStore`: the storage interface for the access/refresh token pair
//! - `MemorySessionStore`, `FileSessionStore`, `KeyringSessionStore`: stores
//!   backed by process memory, a JSON file, or the OS keychain
//! - `SessionManager`: owns a store and coalesces concurrent token refreshes

pub mod credentials;
pub mod manager;
pub mod session;
pub mod store;

pub use credentials::KeyringSessionStore;
pub use manager::{SessionManager, SessionSnapshot};
pub use session::{FileSessionStore, SessionData};
pub use store::{
    Credentials, MemorySessionStore, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
