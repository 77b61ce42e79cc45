//! Last-signal-wins coalescing timer.

use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

/// Single-deadline timer that restarts on every signal.
///
/// A burst of signals yields one firing, `delay` after the last signal. At
/// most one firing is ever pending.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use iqraa_runtime::{CoalescingTrigger, VirtualClock};
///
/// let clock = VirtualClock::new();
/// let mut trigger = CoalescingTrigger::new(Duration::from_millis(80), &clock);
/// trigger.signal();
/// clock.advance(Duration::from_millis(50));
/// trigger.signal();
/// clock.advance(Duration::from_millis(50));
/// assert!(!trigger.poll());
/// clock.advance(Duration::from_millis(30));
/// assert!(trigger.poll());
/// assert!(!trigger.poll());
/// ```
#[derive(Debug)]
pub struct CoalescingTrigger<C = SystemClock> {
    delay: Duration,
    clock: C,
    deadline: Option<Instant>,
}

impl<C: Clock> CoalescingTrigger<C> {
    /// Create an idle trigger firing `delay` after the last signal.
    pub fn new(delay: Duration, clock: C) -> Self {
        Self {
            delay,
            clock,
            deadline: None,
        }
    }

    /// The quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The clock driving the trigger.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Restart the quiet period.
    pub fn signal(&mut self) {
        self.deadline = Some(self.clock.now() + self.delay);
    }

    /// Whether a firing is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending firing is due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending firing if its quiet period has elapsed.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= self.clock.now() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending firing regardless of the deadline.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
