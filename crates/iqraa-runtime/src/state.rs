//! Per-page initialization state.

/// Registration flags shared by everything that attaches to a page.
///
/// One value exists per page load and is passed by reference to whoever needs
/// to register; both operations are idempotent.
#[derive(Debug, Default)]
pub struct InitState {
    bound: bool,
    observing: bool,
}

impl InitState {
    /// Create state for a fresh page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark UI handlers as bound.
    ///
    /// Returns `true` only for the call that performed the binding.
    pub fn ensure_bound(&mut self) -> bool {
        !std::mem::replace(&mut self.bound, true)
    }

    /// Mark the mutation observer as registered.
    ///
    /// Returns `true` only for the call that performed the registration.
    pub fn ensure_observing(&mut self) -> bool {
        !std::mem::replace(&mut self.observing, true)
    }

    /// Whether UI handlers are bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Whether the mutation observer is registered.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }
}
