//! Transient and persistent on-screen notifications.

use chrono::{DateTime, Duration, Utc};
use passvault_core::session::Notifier;

/// How long success/error toasts stay on screen
const TOAST_DURATION_SECS: i64 = 4;

/// Most toasts shown at once; older transient ones are dropped first
const MAX_VISIBLE_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    /// Stays until dismissed by id
    Persistent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.push_transient(ToastKind::Success, message.into(), now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.push_transient(ToastKind::Error, message.into(), now);
    }

    fn push_transient(&mut self, kind: ToastKind, message: String, now: DateTime<Utc>) {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: format!("toast-{}", self.next_id),
            kind,
            message,
            expires_at: Some(now + Duration::seconds(TOAST_DURATION_SECS)),
        });

        while self.toasts.len() > MAX_VISIBLE_TOASTS {
            match self.toasts.iter().position(|t| t.expires_at.is_some()) {
                Some(oldest) => {
                    self.toasts.remove(oldest);
                }
                None => break,
            }
        }
    }

    /// Drop transient toasts whose time is up.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.toasts
            .retain(|t| t.expires_at.map(|at| at > now).unwrap_or(true));
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn show_persistent(&mut self, id: &str, message: &str) {
        self.toasts.retain(|t| t.id != id);
        self.toasts.push(Toast {
            id: id.to_string(),
            kind: ToastKind::Persistent,
            message: message.to_string(),
            expires_at: None,
        });
    }

    fn dismiss(&mut self, id: &str) {
        self.toasts.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_toasts_expire_after_four_seconds() {
        let now = Utc::now();
        let mut toasts = ToastQueue::new();
        toasts.success("Saved", now);

        toasts.expire(now + Duration::milliseconds(3999));
        assert_eq!(toasts.iter().count(), 1);

        toasts.expire(now + Duration::seconds(4));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_persistent_toast_survives_expiry() {
        let now = Utc::now();
        let mut toasts = ToastQueue::new();
        toasts.show_persistent("notice", "Logged out");

        toasts.expire(now + Duration::hours(1));
        assert_eq!(toasts.get("notice").map(|t| t.kind), Some(ToastKind::Persistent));
    }

    #[test]
    fn test_same_id_replaces() {
        let mut toasts = ToastQueue::new();
        toasts.show_persistent("notice", "first");
        toasts.show_persistent("notice", "second");

        assert_eq!(toasts.iter().count(), 1);
        assert_eq!(toasts.get("notice").map(|t| t.message.as_str()), Some("second"));
    }

    #[test]
    fn test_dismiss_unknown_id_is_noop() {
        let mut toasts = ToastQueue::new();
        toasts.error("boom", Utc::now());
        toasts.dismiss("missing");
        assert_eq!(toasts.iter().count(), 1);
    }

    #[test]
    fn test_overflow_drops_oldest_transient_not_persistent() {
        let now = Utc::now();
        let mut toasts = ToastQueue::new();
        toasts.show_persistent("notice", "Logged out");
        for i in 0..6 {
            toasts.error(format!("error {}", i), now);
        }

        assert_eq!(toasts.iter().count(), MAX_VISIBLE_TOASTS);
        assert!(toasts.get("notice").is_some());
        assert_eq!(toasts.iter().last().map(|t| t.message.as_str()), Some("error 5"));
    }
}
