//! The session state machine.
//!
//! `SessionController` is the single owner of the session token, the
//! inactivity timer and the activity subscription. The UI loop feeds it
//! interaction events and calls [`SessionController::tick`] on every
//! iteration; everything runs to completion on that one thread.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::Credential;
use crate::clock::Clock;

use super::activity::{ActivitySignalSource, InteractionEvent};
use super::timer::InactivityTimer;
use super::token_store::TokenStore;

/// Why a session ended without the user asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoluntaryCause {
    /// No activity for the whole inactivity timeout.
    Inactivity,
    /// The backend refused the token.
    TokenRejected,
}

/// Tag carried by every logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    Voluntary,
    Involuntary(InvoluntaryCause),
}

/// Transition events published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A live session was ended involuntarily.
    Deauthenticated {
        cause: InvoluntaryCause,
        at: DateTime<Utc>,
    },
}

pub struct SessionController {
    clock: Arc<dyn Clock>,
    store: TokenStore,
    timer: InactivityTimer,
    activity: ActivitySignalSource,
    token: Option<String>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionController {
    /// Build the controller, restoring a stored session if there is one.
    pub fn new(store: TokenStore, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self::with_activity_source(store, clock, timeout, ActivitySignalSource::default())
    }

    pub fn with_activity_source(
        store: TokenStore,
        clock: Arc<dyn Clock>,
        timeout: Duration,
        activity: ActivitySignalSource,
    ) -> Self {
        let mut controller = Self {
            clock,
            store,
            timer: InactivityTimer::new(timeout),
            activity,
            token: None,
            events: None,
        };

        if let Some(token) = controller.store.load() {
            controller.token = Some(token);
            controller.activity.subscribe();
            controller.timer.arm(controller.clock.now());
            info!("Restored stored session");
        }

        controller
    }

    /// Receive involuntary termination events. Replaces any earlier
    /// subscriber.
    pub fn subscribe_events(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start (or replace) the session with `token`.
    pub fn login(&mut self, token: &str) {
        if let Err(e) = self.store.save(token) {
            warn!(error = %e, "Failed to persist session token, session will not survive restart");
        }

        let replaced = self.token.replace(token.to_string()).is_some();
        self.activity.subscribe();
        self.timer.arm(self.clock.now());

        info!(replaced, "Session started");
    }

    /// End the session. Returns `true` if a live session was ended.
    ///
    /// Calling this with no live session still tears down the timer,
    /// listeners and stored token, but publishes nothing.
    pub fn logout(&mut self, reason: TerminationReason) -> bool {
        self.timer.disarm();
        self.activity.unsubscribe();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to erase stored session token");
        }

        if self.token.take().is_none() {
            debug!(?reason, "Logout with no live session");
            return false;
        }

        match reason {
            TerminationReason::Voluntary => info!("Logged out"),
            TerminationReason::Involuntary(cause) => {
                warn!(?cause, "Session ended involuntarily");
                self.publish(SessionEvent::Deauthenticated {
                    cause,
                    at: self.clock.now(),
                });
            }
        }
        true
    }

    /// Fire the inactivity timeout if its deadline has passed. Also retries
    /// erasing a stored token that an earlier logout could not remove.
    pub fn tick(&mut self) -> Option<TerminationReason> {
        self.store.retry_pending_clear();
        if self.timer.poll(self.clock.now()) {
            let reason = TerminationReason::Involuntary(InvoluntaryCause::Inactivity);
            self.logout(reason);
            return Some(reason);
        }
        None
    }

    /// Feed one raw interaction. Returns `true` if it counted as activity.
    ///
    /// A deadline that has already passed is honoured before the event, so
    /// a key press arriving late cannot revive an expired session.
    pub fn handle_interaction(&mut self, event: InteractionEvent) -> bool {
        self.tick();
        match self.activity.observe(event, self.clock.now()) {
            Some(pulse) => {
                self.timer.reset(pulse.at);
                true
            }
            None => false,
        }
    }

    fn publish(&mut self, event: SessionEvent) {
        if let Some(ref tx) = self.events {
            if tx.send(event).is_err() {
                debug!("Session event subscriber dropped");
                self.events = None;
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The outbound credential kept in step with this session.
    pub fn credential(&self) -> &Credential {
        self.store.credential()
    }

    /// Time left before the inactivity logout, while a session is live.
    pub fn time_until_timeout(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    pub fn timer(&self) -> &InactivityTimer {
        &self.timer
    }

    pub fn activity(&self) -> &ActivitySignalSource {
        &self.activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::token_store::MemoryStore;

    struct Harness {
        controller: SessionController,
        clock: ManualClock,
        memory: MemoryStore,
        events: mpsc::UnboundedReceiver<SessionEvent>,
    }

    fn harness_with(memory: MemoryStore) -> Harness {
        let clock = ManualClock::default();
        let store = TokenStore::new(Box::new(memory.clone()), Credential::new());
        let mut controller = SessionController::new(
            store,
            Arc::new(clock.clone()),
            Duration::minutes(15),
        );
        let events = controller.subscribe_events();
        Harness {
            controller,
            clock,
            memory,
            events,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new())
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    fn inactivity_events(events: &[SessionEvent]) -> usize {
        events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    SessionEvent::Deauthenticated {
                        cause: InvoluntaryCause::Inactivity,
                        ..
                    }
                )
            })
            .count()
    }

    // -------------------------------------------------------------------------
    // Timeout behaviour
    // -------------------------------------------------------------------------

    #[test]
    fn test_idle_session_times_out_once() {
        let mut h = harness();
        h.controller.login("tok");

        h.clock.advance(Duration::minutes(15));
        assert_eq!(
            h.controller.tick(),
            Some(TerminationReason::Involuntary(InvoluntaryCause::Inactivity))
        );
        assert!(!h.controller.is_authenticated());

        h.clock.advance(Duration::minutes(30));
        assert_eq!(h.controller.tick(), None);

        let events = drain(&mut h.events);
        assert_eq!(events.len(), 1);
        assert_eq!(inactivity_events(&events), 1);
    }

    #[test]
    fn test_activity_every_five_minutes_keeps_session_alive() {
        let mut h = harness();
        h.controller.login("tok");

        for _ in 0..7 {
            h.clock.advance(Duration::minutes(5));
            assert_eq!(h.controller.tick(), None);
            assert!(h.controller.handle_interaction(InteractionEvent::PointerMove));
        }

        assert!(h.controller.is_authenticated());
        assert!(drain(&mut h.events).is_empty());
    }

    #[test]
    fn test_pulse_resets_to_absolute_deadline() {
        let mut h = harness();
        let start = h.clock.now();
        h.controller.login("tok");

        h.clock.advance(Duration::minutes(14) + Duration::seconds(59));
        h.controller.handle_interaction(InteractionEvent::KeyDown);

        assert_eq!(
            h.controller.timer().deadline(),
            Some(start + Duration::minutes(29) + Duration::seconds(59))
        );
    }

    #[test]
    fn test_voluntary_logout_disarms_timer() {
        let mut h = harness();
        h.controller.login("tok");

        h.clock.advance(Duration::minutes(1));
        assert!(h.controller.logout(TerminationReason::Voluntary));
        assert!(!h.controller.timer().is_armed());

        h.clock.advance(Duration::minutes(20));
        assert_eq!(h.controller.tick(), None);
        assert!(drain(&mut h.events).is_empty());
    }

    #[test]
    fn test_double_logout_is_single_effective_logout() {
        let mut h = harness();
        h.controller.login("tok");
        h.clock.advance(Duration::minutes(15));

        // Timer fires, then the user's click lands
        h.controller.tick();
        assert!(!h.controller.logout(TerminationReason::Voluntary));
        assert!(!h.controller.logout(TerminationReason::Involuntary(
            InvoluntaryCause::Inactivity
        )));

        assert_eq!(h.controller.activity().installs(), 1);
        assert_eq!(h.controller.activity().removals(), 1);
        assert_eq!(drain(&mut h.events).len(), 1);
    }

    #[test]
    fn test_user_logout_then_timer_race_emits_nothing() {
        let mut h = harness();
        h.controller.login("tok");
        h.clock.advance(Duration::minutes(15));

        assert!(h.controller.logout(TerminationReason::Voluntary));
        assert_eq!(h.controller.tick(), None);
        assert!(drain(&mut h.events).is_empty());
    }

    #[test]
    fn test_inactivity_scenario_timeline() {
        let mut h = harness();
        h.controller.login("tok");

        h.clock.advance(Duration::seconds(899));
        assert_eq!(h.controller.tick(), None);
        h.controller.handle_interaction(InteractionEvent::PointerDown);

        h.clock.advance(Duration::seconds(899));
        assert_eq!(h.controller.tick(), None);
        assert!(h.controller.is_authenticated());

        h.clock.advance(Duration::seconds(1));
        assert_eq!(
            h.controller.tick(),
            Some(TerminationReason::Involuntary(InvoluntaryCause::Inactivity))
        );
        assert_eq!(inactivity_events(&drain(&mut h.events)), 1);
    }

    #[test]
    fn test_late_interaction_cannot_revive_expired_session() {
        let mut h = harness();
        h.controller.login("tok");
        h.clock.advance(Duration::minutes(16));

        assert!(!h.controller.handle_interaction(InteractionEvent::KeyDown));
        assert!(!h.controller.is_authenticated());
        assert_eq!(drain(&mut h.events).len(), 1);
    }

    #[test]
    fn test_interaction_after_logout_is_noop() {
        let mut h = harness();
        h.controller.login("tok");
        h.controller.logout(TerminationReason::Voluntary);
        let arms = h.controller.timer().arm_count();

        assert!(!h.controller.handle_interaction(InteractionEvent::KeyDown));
        assert_eq!(h.controller.timer().arm_count(), arms);
        assert!(!h.controller.timer().is_armed());
    }

    // -------------------------------------------------------------------------
    // Login / storage
    // -------------------------------------------------------------------------

    #[test]
    fn test_stored_token_restores_session() {
        let memory = MemoryStore::new();
        {
            let mut first = harness_with(memory.clone());
            first.controller.login("abc");
        }

        let h = harness_with(memory);
        assert!(h.controller.is_authenticated());
        assert_eq!(h.controller.token(), Some("abc"));
        assert_eq!(h.controller.credential().current().as_deref(), Some("abc"));
        assert!(h.controller.timer().is_armed());
        assert!(h.controller.activity().is_subscribed());
    }

    #[test]
    fn test_relogin_replaces_token_without_double_subscribe() {
        let mut h = harness();
        h.controller.login("first");
        h.clock.advance(Duration::minutes(10));
        h.controller.login("second");

        assert_eq!(h.controller.token(), Some("second"));
        assert_eq!(h.controller.credential().current().as_deref(), Some("second"));
        assert_eq!(h.controller.activity().installs(), 1);
        assert_eq!(h.controller.time_until_timeout(), Some(Duration::minutes(15)));

        h.controller.logout(TerminationReason::Voluntary);
        assert_eq!(h.controller.activity().removals(), 1);
    }

    #[test]
    fn test_logout_clears_store_and_credential() {
        let mut h = harness();
        h.controller.login("tok");
        h.controller.logout(TerminationReason::Voluntary);

        assert!(!h.controller.credential().is_attached());
        let fresh = harness_with(h.memory.clone());
        assert!(!fresh.controller.is_authenticated());
    }

    #[test]
    fn test_unavailable_storage_keeps_in_memory_session_only() {
        let memory = MemoryStore::new();
        memory.set_available(false);
        let mut h = harness_with(memory.clone());

        h.controller.login("tok");
        assert!(h.controller.is_authenticated());
        assert!(h.controller.credential().is_attached());

        memory.set_available(true);
        let restarted = harness_with(memory);
        assert!(!restarted.controller.is_authenticated());
    }

    #[test]
    fn test_logout_during_storage_outage_stays_logged_out_after_restart() {
        let memory = MemoryStore::new();
        let mut h = harness_with(memory.clone());
        h.controller.login("tok");

        memory.set_available(false);
        assert!(h.controller.logout(TerminationReason::Voluntary));
        memory.set_available(true);
        drop(h);

        let restarted = harness_with(memory);
        assert!(!restarted.controller.is_authenticated());
    }

    #[test]
    fn test_tick_erases_token_once_storage_returns() {
        let memory = MemoryStore::new();
        let mut h = harness_with(memory.clone());
        h.controller.login("tok");

        memory.set_available(false);
        h.controller.logout(TerminationReason::Voluntary);
        memory.set_available(true);
        h.controller.tick();

        // Old process still running; a second instance must not resume
        let second = harness_with(memory);
        assert!(!second.controller.is_authenticated());
    }

    #[test]
    fn test_failed_relogin_save_does_not_restore_previous_token() {
        let memory = MemoryStore::new();
        let mut h = harness_with(memory.clone());
        h.controller.login("first");

        memory.set_available(false);
        h.controller.login("second");
        assert_eq!(h.controller.credential().current().as_deref(), Some("second"));

        memory.set_available(true);
        h.controller.tick();

        let restarted = harness_with(memory);
        assert!(!restarted.controller.is_authenticated());
    }

    #[test]
    fn test_token_rejection_publishes_cause() {
        let mut h = harness();
        h.controller.login("tok");
        assert!(h
            .controller
            .logout(TerminationReason::Involuntary(InvoluntaryCause::TokenRejected)));

        let events = drain(&mut h.events);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Deauthenticated {
                cause: InvoluntaryCause::TokenRejected,
                ..
            }]
        ));
    }

    #[test]
    fn test_time_until_timeout_counts_down() {
        let mut h = harness();
        assert_eq!(h.controller.time_until_timeout(), None);

        h.controller.login("tok");
        h.clock.advance(Duration::minutes(4));
        assert_eq!(h.controller.time_until_timeout(), Some(Duration::minutes(11)));
    }
}
