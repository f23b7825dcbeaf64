use chrono::{DateTime, Duration, Utc};

/// Raw events closer together than this collapse into one pulse
pub const DEFAULT_DEBOUNCE_MS: i64 = 250;

/// A user interaction, normalized from whatever input layer produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    PointerMove,
    KeyDown,
    PointerDown,
    TouchStart,
    /// Anything else the input layer saw (resize, focus, scroll, key release).
    Other,
}

impl InteractionEvent {
    /// Whether this event counts as session activity.
    pub fn is_activity(self) -> bool {
        !matches!(self, InteractionEvent::Other)
    }
}

/// A normalized "the user did something just now" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPulse {
    pub at: DateTime<Utc>,
}

/// Turns raw interaction events into debounced activity pulses.
///
/// Pulses are only produced while subscribed. The source keeps counts of
/// installs and removals so that a listener leak shows up as a mismatch.
#[derive(Debug, Clone)]
pub struct ActivitySignalSource {
    subscribed: bool,
    debounce: Duration,
    last_pulse: Option<DateTime<Utc>>,
    installs: u64,
    removals: u64,
}

impl ActivitySignalSource {
    pub fn new(debounce: Duration) -> Self {
        Self {
            subscribed: false,
            debounce,
            last_pulse: None,
            installs: 0,
            removals: 0,
        }
    }

    /// Install the listeners. Returns `false` if they were already installed.
    pub fn subscribe(&mut self) -> bool {
        if self.subscribed {
            return false;
        }
        self.subscribed = true;
        self.last_pulse = None;
        self.installs += 1;
        true
    }

    /// Remove the listeners. Safe to call when not subscribed.
    pub fn unsubscribe(&mut self) {
        if self.subscribed {
            self.subscribed = false;
            self.last_pulse = None;
            self.removals += 1;
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Feed one raw event. Yields a pulse for qualifying events outside the
    /// debounce window.
    pub fn observe(&mut self, event: InteractionEvent, now: DateTime<Utc>) -> Option<ActivityPulse> {
        if !self.subscribed || !event.is_activity() {
            return None;
        }
        if let Some(last) = self.last_pulse {
            if now - last < self.debounce {
                return None;
            }
        }
        self.last_pulse = Some(now);
        Some(ActivityPulse { at: now })
    }

    pub fn installs(&self) -> u64 {
        self.installs
    }

    pub fn removals(&self) -> u64 {
        self.removals
    }
}

impl Default for ActivitySignalSource {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_DEBOUNCE_MS))
    }
}
