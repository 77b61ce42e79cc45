//! Debounced re-processing after scope mutations.

use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::PassError;
use crate::state::InitState;
use crate::trigger::CoalescingTrigger;

/// Default quiet period between the last mutation and the next pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(80);

/// Turns scope mutations into at most one pending pass.
///
/// Mutations are ignored until [`MutationCoordinator::observe`] registered the
/// coordinator. Once registered it stays registered for the life of the page,
/// including after failed passes.
#[derive(Debug)]
pub struct MutationCoordinator<C = SystemClock> {
    trigger: CoalescingTrigger<C>,
    observing: bool,
}

impl<C: Clock> MutationCoordinator<C> {
    /// Create an unregistered coordinator.
    pub fn new(debounce: Duration, clock: C) -> Self {
        Self {
            trigger: CoalescingTrigger::new(debounce, clock),
            observing: false,
        }
    }

    /// Register for mutations unless the page already has an observer.
    ///
    /// Returns `true` if this call registered.
    pub fn observe(&mut self, state: &mut InitState) -> bool {
        if !state.ensure_observing() {
            return false;
        }
        self.observing = true;
        tracing::debug!(debounce = ?self.trigger.delay(), "Observing scope mutations");
        true
    }

    /// Whether this coordinator is registered.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Whether a pass is waiting for its quiet period.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.trigger.is_pending()
    }

    /// The clock driving the debounce.
    pub fn clock(&self) -> &C {
        self.trigger.clock()
    }

    /// Note a child-list or subtree change in the scope.
    pub fn record_mutation(&mut self) {
        if self.observing {
            self.trigger.signal();
        }
    }

    /// Run `pass` if its quiet period has elapsed.
    ///
    /// Returns `None` when nothing was due. A failed pass is logged and
    /// returned; observation continues either way.
    pub fn run_due<T>(
        &mut self,
        pass: impl FnOnce() -> Result<T, PassError>,
    ) -> Option<Result<T, PassError>> {
        self.trigger.poll().then(|| Self::run(pass))
    }

    /// Run the pending pass now, ignoring the quiet period.
    pub fn flush<T>(
        &mut self,
        pass: impl FnOnce() -> Result<T, PassError>,
    ) -> Option<Result<T, PassError>> {
        self.trigger.flush().then(|| Self::run(pass))
    }

    fn run<T>(pass: impl FnOnce() -> Result<T, PassError>) -> Result<T, PassError> {
        let result = pass();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Re-processing pass failed");
        }
        result
    }
}
