use std::time::{Duration, Instant};

/// Delay-and-collapse scheduler for high-frequency parameter changes.
///
/// Each trigger replaces the pending value and restarts the quiet period;
/// [`poll`](Debouncer::poll) yields the latest value once the period has
/// elapsed with no newer trigger, so a burst of slider events becomes one
/// engine call carrying the final values. The clock is passed in explicitly
/// so tests control it.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Schedule `value`, replacing any not-yet-fired schedule.
    pub fn trigger(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// The scheduled value, once its quiet period has elapsed. Fires at most
    /// once per schedule.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Time left until the pending schedule fires, if one exists. Used to
    /// ask the UI shell for a wakeup instead of busy-polling.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.quiet.saturating_sub(now.duration_since(*at)))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
