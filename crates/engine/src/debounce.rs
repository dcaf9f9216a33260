//! Deadline-based trailing debounce.
//!
//! The engine never spawns timers of its own. A [`Debouncer`] records a
//! deadline when scheduled, and the host polls it from its tick loop with the
//! current instant. This keeps the engine deterministic under test: callers
//! pass whatever `Instant` they like.

use std::time::{Duration, Instant};

/// A trailing debounce timer driven by explicit instants.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use cardgrid_engine::debounce::Debouncer;
///
/// let mut debounce = Debouncer::new(Duration::from_millis(300));
/// let start = Instant::now();
///
/// debounce.schedule(start);
/// assert!(!debounce.fire(start + Duration::from_millis(299)));
/// assert!(debounce.fire(start + Duration::from_millis(300)));
/// // Fires only once per schedule.
/// assert!(!debounce.fire(start + Duration::from_millis(400)));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates an idle debouncer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms (or re-arms) the timer so it fires `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is armed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns the armed deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` has reached the deadline,
    /// disarming the timer.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
