//! Propagation of involuntary logouts to the UI.
//!
//! [`DeauthNotifier`] turns `SessionEvent::Deauthenticated` into a redirect
//! to the login view carrying a reason. The login view then drives an
//! [`EntryNotice`]: a persistent message that is dismissed by the first
//! pointer move or key press, after which its listener is gone.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::activity::InteractionEvent;
use super::controller::{InvoluntaryCause, SessionEvent};

/// Fixed id of the "you were logged out" notice. Showing it again replaces
/// the existing one.
pub const DEAUTH_NOTICE_ID: &str = "inactivity-logout-notice";

/// Views the application can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Generator,
}

impl Route {
    /// The view unauthenticated users land on.
    pub const ENTRY: Route = Route::Login;

    pub fn requires_session(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Inactivity,
    Expired,
}

impl RedirectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectReason::Inactivity => "inactivity",
            RedirectReason::Expired => "expired",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RedirectReason::Inactivity => "You have been logged out due to inactivity.",
            RedirectReason::Expired => "Your session expired. Please sign in again.",
        }
    }
}

impl From<InvoluntaryCause> for RedirectReason {
    fn from(cause: InvoluntaryCause) -> Self {
        match cause {
            InvoluntaryCause::Inactivity => RedirectReason::Inactivity,
            InvoluntaryCause::TokenRejected => RedirectReason::Expired,
        }
    }
}

/// Data attached to a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavPayload {
    pub reason: Option<RedirectReason>,
}

impl NavPayload {
    pub fn with_reason(reason: RedirectReason) -> Self {
        Self {
            reason: Some(reason),
        }
    }
}

pub trait Navigator {
    fn navigate_to(&mut self, route: Route, payload: Option<NavPayload>);
}

pub trait Notifier {
    /// Show a message that stays until dismissed. Reusing `id` replaces.
    fn show_persistent(&mut self, id: &str, message: &str);
    fn dismiss(&mut self, id: &str);
}

// ============================================================================
// DeauthNotifier
// ============================================================================

/// Consumes session events and redirects to the entry view with a reason.
pub struct DeauthNotifier {
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl DeauthNotifier {
    pub fn new(events: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self { events }
    }

    /// Handle every pending event. Returns how many redirects were issued.
    pub fn pump(&mut self, navigator: &mut dyn Navigator) -> usize {
        let mut redirects = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Deauthenticated { cause, at } => {
                    let reason = RedirectReason::from(cause);
                    info!(reason = reason.as_str(), %at, "Redirecting to login");
                    navigator.navigate_to(Route::ENTRY, Some(NavPayload::with_reason(reason)));
                    redirects += 1;
                }
            }
        }
        redirects
    }
}

// ============================================================================
// EntryNotice
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeState {
    Idle,
    /// Notice visible, one-shot listener installed.
    Shown(RedirectReason),
    Dismissed,
}

/// One-shot persistent notice owned by the entry view.
#[derive(Debug, Clone)]
pub struct EntryNotice {
    state: NoticeState,
}

impl EntryNotice {
    pub fn new() -> Self {
        Self {
            state: NoticeState::Idle,
        }
    }

    /// Called when the entry view is shown. Returns `true` if the payload
    /// carried a reason and the notice is now up.
    pub fn on_enter(&mut self, payload: Option<NavPayload>, notifier: &mut dyn Notifier) -> bool {
        let Some(reason) = payload.and_then(|p| p.reason) else {
            return false;
        };
        notifier.show_persistent(DEAUTH_NOTICE_ID, reason.message());
        self.state = NoticeState::Shown(reason);
        debug!(reason = reason.as_str(), "Persistent logout notice shown");
        true
    }

    /// Offer an interaction to the one-shot listener. Returns `true` if it
    /// dismissed the notice.
    pub fn on_interaction(&mut self, event: InteractionEvent, notifier: &mut dyn Notifier) -> bool {
        if !self.is_listening() {
            return false;
        }
        if !matches!(event, InteractionEvent::PointerMove | InteractionEvent::KeyDown) {
            return false;
        }
        notifier.dismiss(DEAUTH_NOTICE_ID);
        self.state = NoticeState::Dismissed;
        debug!("Persistent logout notice dismissed by activity");
        true
    }

    /// Called when the entry view is torn down. Removes the listener and the
    /// notice it guards.
    pub fn on_leave(&mut self, notifier: &mut dyn Notifier) {
        if self.is_listening() {
            notifier.dismiss(DEAUTH_NOTICE_ID);
            self.state = NoticeState::Idle;
        }
    }

    pub fn state(&self) -> NoticeState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, NoticeState::Shown(_))
    }
}

impl Default for EntryNotice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::api::Credential;
    use crate::clock::ManualClock;
    use crate::session::controller::{SessionController, TerminationReason};
    use crate::session::token_store::{MemoryStore, TokenStore};

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Vec<(Route, Option<NavPayload>)>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&mut self, route: Route, payload: Option<NavPayload>) {
            self.visits.push((route, payload));
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        visible: BTreeMap<String, String>,
        dismissals: usize,
    }

    impl Notifier for RecordingNotifier {
        fn show_persistent(&mut self, id: &str, message: &str) {
            self.visible.insert(id.to_string(), message.to_string());
        }

        fn dismiss(&mut self, id: &str) {
            if self.visible.remove(id).is_some() {
                self.dismissals += 1;
            }
        }
    }

    fn controller(clock: &ManualClock) -> SessionController {
        let store = TokenStore::new(Box::new(MemoryStore::new()), Credential::new());
        SessionController::new(store, Arc::new(clock.clone()), Duration::minutes(15))
    }

    // -------------------------------------------------------------------------
    // DeauthNotifier
    // -------------------------------------------------------------------------

    #[test]
    fn test_timeout_redirects_with_inactivity_reason() {
        let clock = ManualClock::default();
        let mut session = controller(&clock);
        let mut deauth = DeauthNotifier::new(session.subscribe_events());
        let mut nav = RecordingNavigator::default();

        session.login("tok");
        clock.advance(Duration::minutes(15));
        session.tick();

        assert_eq!(deauth.pump(&mut nav), 1);
        assert_eq!(
            nav.visits,
            vec![(
                Route::Login,
                Some(NavPayload::with_reason(RedirectReason::Inactivity))
            )]
        );
        assert_eq!(deauth.pump(&mut nav), 0);
    }

    #[test]
    fn test_voluntary_logout_does_not_redirect() {
        let clock = ManualClock::default();
        let mut session = controller(&clock);
        let mut deauth = DeauthNotifier::new(session.subscribe_events());
        let mut nav = RecordingNavigator::default();

        session.login("tok");
        session.logout(TerminationReason::Voluntary);

        assert_eq!(deauth.pump(&mut nav), 0);
        assert!(nav.visits.is_empty());
    }

    // -------------------------------------------------------------------------
    // EntryNotice
    // -------------------------------------------------------------------------

    #[test]
    fn test_first_key_press_dismisses_notice_once() {
        let clock = ManualClock::default();
        let mut session = controller(&clock);
        let mut deauth = DeauthNotifier::new(session.subscribe_events());
        let mut nav = RecordingNavigator::default();
        let mut notifier = RecordingNotifier::default();
        let mut notice = EntryNotice::new();

        session.login("tok");
        clock.advance(Duration::minutes(15));
        session.tick();
        deauth.pump(&mut nav);

        let (_, payload) = nav.visits[0];
        assert!(notice.on_enter(payload, &mut notifier));
        assert_eq!(
            notifier.visible.get(DEAUTH_NOTICE_ID).map(String::as_str),
            Some(RedirectReason::Inactivity.message())
        );

        assert!(notice.on_interaction(InteractionEvent::KeyDown, &mut notifier));
        assert!(!notice.on_interaction(InteractionEvent::KeyDown, &mut notifier));
        assert_eq!(notifier.dismissals, 1);
        assert!(notifier.visible.is_empty());
        assert_eq!(notice.state(), NoticeState::Dismissed);
    }

    #[test]
    fn test_only_pointer_move_and_key_down_dismiss() {
        let mut notifier = RecordingNotifier::default();
        let mut notice = EntryNotice::new();
        notice.on_enter(
            Some(NavPayload::with_reason(RedirectReason::Inactivity)),
            &mut notifier,
        );

        assert!(!notice.on_interaction(InteractionEvent::PointerDown, &mut notifier));
        assert!(!notice.on_interaction(InteractionEvent::TouchStart, &mut notifier));
        assert!(!notice.on_interaction(InteractionEvent::Other, &mut notifier));
        assert!(notice.is_listening());

        assert!(notice.on_interaction(InteractionEvent::PointerMove, &mut notifier));
    }

    #[test]
    fn test_no_payload_shows_nothing() {
        let mut notifier = RecordingNotifier::default();
        let mut notice = EntryNotice::new();

        assert!(!notice.on_enter(None, &mut notifier));
        assert!(!notice.on_enter(Some(NavPayload::default()), &mut notifier));
        assert!(notifier.visible.is_empty());
        assert!(!notice.on_interaction(InteractionEvent::KeyDown, &mut notifier));
    }

    #[test]
    fn test_second_redirect_replaces_notice() {
        let mut notifier = RecordingNotifier::default();
        let mut notice = EntryNotice::new();

        notice.on_enter(
            Some(NavPayload::with_reason(RedirectReason::Inactivity)),
            &mut notifier,
        );
        notice.on_enter(
            Some(NavPayload::with_reason(RedirectReason::Expired)),
            &mut notifier,
        );

        assert_eq!(notifier.visible.len(), 1);
        assert_eq!(notice.state(), NoticeState::Shown(RedirectReason::Expired));
    }

    #[test]
    fn test_leaving_view_removes_listener() {
        let mut notifier = RecordingNotifier::default();
        let mut notice = EntryNotice::new();
        notice.on_enter(
            Some(NavPayload::with_reason(RedirectReason::Inactivity)),
            &mut notifier,
        );

        notice.on_leave(&mut notifier);
        assert_eq!(notice.state(), NoticeState::Idle);
        assert!(notifier.visible.is_empty());

        assert!(!notice.on_interaction(InteractionEvent::KeyDown, &mut notifier));
        assert_eq!(notifier.dismissals, 1);
    }

    #[test]
    fn test_token_rejection_maps_to_expired() {
        assert_eq!(
            RedirectReason::from(InvoluntaryCause::TokenRejected),
            RedirectReason::Expired
        );
        assert_eq!(RedirectReason::Expired.as_str(), "expired");
        assert_eq!(RedirectReason::Inactivity.as_str(), "inactivity");
    }
}
