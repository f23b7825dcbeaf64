//! Session lifecycle management.
//!
//! This module provides:
//! - `TokenStore`: durable token persistence that keeps the outbound
//!   credential in step with what is stored
//! - `ActivitySignalSource`: raw interactions to debounced activity pulses
//! - `InactivityTimer`: single-shot inactivity countdown
//! - `SessionController`: login/logout and the voluntary/involuntary split
//! - `DeauthNotifier` and `EntryNotice`: redirect-with-reason and the
//!   one-shot "you were logged out" notice
//!
//! Sessions end after 15 minutes without user activity.

pub mod activity;
pub mod controller;
pub mod deauth;
pub mod timer;
pub mod token_store;

pub use activity::{ActivityPulse, ActivitySignalSource, InteractionEvent};
pub use controller::{InvoluntaryCause, SessionController, SessionEvent, TerminationReason};
pub use deauth::{
    DeauthNotifier, EntryNotice, NavPayload, Navigator, NoticeState, Notifier, RedirectReason,
    Route, DEAUTH_NOTICE_ID,
};
pub use timer::{InactivityTimer, TimerState, INACTIVITY_TIMEOUT_MINUTES};
pub use token_store::{DurableStore, FileStore, KeyringStore, MemoryStore, StoreError, TokenStore};
