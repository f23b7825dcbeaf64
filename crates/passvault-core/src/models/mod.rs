//! Data models for the vault backend API.

pub mod password;

pub use password::{LoginResponse, NewPasswordEntry, PasswordEntry, PasswordUpdate, UserResponse};
