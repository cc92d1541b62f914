//! Core library for the Anigmaa client.
//!
//! Provides the authenticated API client, session storage and the data
//! models shared by the command-line front end.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ApiRequest, Attempt};
pub use auth::{SessionManager, SessionStore};
pub use config::{ClientConfig, Config, StoreKind};
