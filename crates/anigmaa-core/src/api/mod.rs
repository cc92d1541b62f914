//! REST API client module for the Anigmaa backend.
//!
//! This module provides the `ApiClient` for talking to the events, social
//! feed, ticketing and analytics API, plus the typed endpoint groups
//! reached through it (`client.events()`, `client.posts()`, ...).
//!
//! The API uses JWT bearer token authentication. Access tokens are renewed
//! transparently through the refresh endpoint when the server answers 401.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::{ApiRequest, Attempt};
