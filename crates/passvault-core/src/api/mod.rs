//! REST client for the vault backend.
//!
//! This module provides the `ApiClient` for logging in, registering and
//! managing password entries, and the shared `Credential` slot that decides
//! which bearer token (if any) goes out with each request.

pub mod client;
pub mod credential;
pub mod error;

pub use client::ApiClient;
pub use credential::Credential;
pub use error::ApiError;
