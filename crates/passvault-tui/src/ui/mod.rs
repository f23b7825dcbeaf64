//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, toasts and overlays
//! - `input`: Terminal event normalization and key handling
//! - `styles`: Color schemes and text styling
//! - `views`: Per-route content (login, vault, generator)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
