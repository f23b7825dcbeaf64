use chrono::{DateTime, Duration, Utc};

/// Inactivity timeout in minutes
pub const INACTIVITY_TIMEOUT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Disarmed,
    Armed { deadline: DateTime<Utc> },
}

/// Single-shot inactivity countdown.
///
/// The timer does not schedule anything itself: its owner polls it with the
/// current time and acts on the one `true` that [`poll`](Self::poll) returns
/// when the deadline passes. Arming always replaces the previous deadline
/// with an absolute `now + timeout`.
#[derive(Debug, Clone)]
pub struct InactivityTimer {
    timeout: Duration,
    state: TimerState,
    arm_count: u64,
}

impl InactivityTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: TimerState::Disarmed,
            arm_count: 0,
        }
    }

    /// Cancel any pending fire and schedule a new one at `now + timeout`.
    ///
    /// A deadline past the representable range saturates at the latest
    /// instant chrono can hold.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        let deadline = now
            .checked_add_signed(self.timeout)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.state = TimerState::Armed { deadline };
        self.arm_count += 1;
    }

    /// Push the deadline out to `now + timeout`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.arm(now);
    }

    /// Cancel the pending fire. No-op when already disarmed.
    pub fn disarm(&mut self) {
        self.state = TimerState::Disarmed;
    }

    /// Returns `true` exactly once when the deadline has been reached, and
    /// disarms the timer.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            TimerState::Armed { deadline } if now >= deadline => {
                self.state = TimerState::Disarmed;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match self.state {
            TimerState::Armed { deadline } => Some(deadline),
            TimerState::Disarmed => None,
        }
    }

    /// Time left before the timer fires, if armed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline()
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of times the timer has been (re)armed.
    pub fn arm_count(&self) -> u64 {
        self.arm_count
    }
}

impl Default for InactivityTimer {
    fn default() -> Self {
        Self::new(Duration::minutes(INACTIVITY_TIMEOUT_MINUTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_fires_once_at_deadline() {
        let mut timer = InactivityTimer::default();
        timer.arm(t0());

        assert!(!timer.poll(t0() + Duration::seconds(899)));
        assert!(timer.poll(t0() + Duration::seconds(900)));
        assert!(!timer.poll(t0() + Duration::seconds(901)));
        assert_eq!(timer.state(), TimerState::Disarmed);
    }

    #[test]
    fn test_reset_is_absolute() {
        let mut timer = InactivityTimer::default();
        timer.arm(t0());

        let pulse = t0() + Duration::minutes(14) + Duration::seconds(59);
        timer.reset(pulse);

        assert_eq!(
            timer.deadline(),
            Some(t0() + Duration::minutes(29) + Duration::seconds(59))
        );
        assert!(!timer.poll(t0() + Duration::minutes(29) + Duration::seconds(58)));
        assert!(timer.poll(t0() + Duration::minutes(29) + Duration::seconds(59)));
    }

    #[test]
    fn test_disarm_cancels_and_is_idempotent() {
        let mut timer = InactivityTimer::default();
        timer.arm(t0());
        timer.disarm();
        timer.disarm();

        assert!(!timer.is_armed());
        assert!(!timer.poll(t0() + Duration::hours(1)));
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut timer = InactivityTimer::new(Duration::minutes(1));
        assert_eq!(timer.remaining(t0()), None);

        timer.arm(t0());
        assert_eq!(timer.remaining(t0()), Some(Duration::minutes(1)));
        assert_eq!(timer.remaining(t0() + Duration::minutes(5)), Some(Duration::zero()));
    }

    #[test]
    fn test_huge_timeout_saturates_instead_of_overflowing() {
        let mut timer = InactivityTimer::new(Duration::days(1_000_000_000));
        timer.arm(t0());

        assert_eq!(timer.deadline(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(!timer.poll(t0() + Duration::days(365 * 1000)));
    }

    #[test]
    fn test_arm_count_tracks_rearms() {
        let mut timer = InactivityTimer::default();
        timer.arm(t0());
        timer.reset(t0() + Duration::minutes(1));
        timer.disarm();
        assert_eq!(timer.arm_count(), 2);
    }
}
