//! Per-route content rendering.

pub mod auth;
pub mod dashboard;
pub mod generator;
