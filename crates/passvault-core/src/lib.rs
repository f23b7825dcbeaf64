//! Core library for passvault.
//!
//! Holds everything that does not draw to a terminal: the session
//! lifecycle (token storage, inactivity timeout, deauthentication
//! notices), the REST client for the vault backend, data models,
//! configuration, CSV import and the password generator.

pub mod api;
pub mod clock;
pub mod config;
pub mod generator;
pub mod import;
pub mod models;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError, Credential};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use session::SessionController;
