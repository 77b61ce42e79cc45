//! Delegated widget interaction: copy buttons and accordions.

use std::time::{Duration, Instant};

use iqraa_dom::{DomError, NodeExt, NodeRef};

use crate::clipboard::{Clipboard, copy_text};
use crate::clock::{Clock, SystemClock};
use crate::state::InitState;

const COPY_BUTTON: &str = ".iCS__copy_btn";
const CODE_SNIPPET: &str = ".iCodeSnippet";
const CODE_BODY: &str = ".iCS__code";
const ACCORDION_HEADER: &str = ".iACC__header";

/// Default delay before a copy button shows its original content again.
pub const DEFAULT_COPY_REVERT: Duration = Duration::from_millis(1200);

/// Transient copy-button labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyLabels {
    pub copied: String,
    pub failed: String,
}

impl Default for CopyLabels {
    fn default() -> Self {
        Self {
            copied: "تم النسخ".to_owned(),
            failed: "فشل النسخ".to_owned(),
        }
    }
}

/// What a delegated event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Handlers are not bound or the target is not a widget.
    Ignored,
    /// Code text reached the clipboard.
    Copied,
    /// Both clipboard paths failed.
    CopyFailed,
    /// An accordion header was toggled into the given state.
    Toggled { expanded: bool },
}

#[derive(Debug)]
struct PendingRevert {
    button: NodeRef,
    markup: String,
    due: Instant,
}

/// Click and keyboard handling for widgets produced by the shortcode engine.
///
/// Handlers act only after [`UiEventBinder::bind`]; binding happens at most
/// once per page. Copy-button labels revert on [`UiEventBinder::tick`].
#[derive(Debug)]
pub struct UiEventBinder<C = SystemClock> {
    clock: C,
    labels: CopyLabels,
    revert_after: Duration,
    bound: bool,
    reverts: Vec<PendingRevert>,
}

impl<C: Clock> UiEventBinder<C> {
    /// Create an unbound binder.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            labels: CopyLabels::default(),
            revert_after: DEFAULT_COPY_REVERT,
            bound: false,
            reverts: Vec::new(),
        }
    }

    /// Set the transient copy labels.
    #[must_use]
    pub fn with_labels(mut self, labels: CopyLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the delay before a copy button reverts.
    #[must_use]
    pub fn with_revert_after(mut self, revert_after: Duration) -> Self {
        self.revert_after = revert_after;
        self
    }

    /// Attach the handlers unless the page already has them.
    ///
    /// Returns `true` if this call attached.
    pub fn bind(&mut self, state: &mut InitState) -> bool {
        if !state.ensure_bound() {
            return false;
        }
        self.bound = true;
        tracing::debug!("Bound widget event handlers");
        true
    }

    /// Whether this binder's handlers are attached.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Number of copy buttons waiting to revert.
    #[must_use]
    pub fn pending_reverts(&self) -> usize {
        self.reverts.len()
    }

    /// Handle a click on `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if a widget selector fails to compile.
    pub fn handle_click(
        &mut self,
        target: &NodeRef,
        clipboard: &dyn Clipboard,
    ) -> Result<EventOutcome, DomError> {
        if !self.bound {
            return Ok(EventOutcome::Ignored);
        }
        if let Some(button) = target.closest(COPY_BUTTON)? {
            return self.copy_code(&button, clipboard);
        }
        if let Some(header) = target.closest(ACCORDION_HEADER)? {
            return Ok(toggle(&header));
        }
        Ok(EventOutcome::Ignored)
    }

    /// Handle a key press on `target`.
    ///
    /// Enter and Space on an accordion header toggle it. Returns the outcome
    /// and whether the key's default action must be suppressed.
    ///
    /// # Errors
    ///
    /// Returns an error if a widget selector fails to compile.
    pub fn handle_key(
        &mut self,
        target: &NodeRef,
        key: &str,
    ) -> Result<(EventOutcome, bool), DomError> {
        if !self.bound || !matches!(key, "Enter" | " ") {
            return Ok((EventOutcome::Ignored, false));
        }
        match target.closest(ACCORDION_HEADER)? {
            Some(header) => Ok((toggle(&header), true)),
            None => Ok((EventOutcome::Ignored, false)),
        }
    }

    /// Restore copy buttons whose status label has been shown long enough.
    ///
    /// Returns the number of buttons restored.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.reverts.len();
        self.reverts.retain(|revert| {
            if revert.due > now {
                return true;
            }
            revert.button.set_inner_html(&revert.markup);
            false
        });
        before - self.reverts.len()
    }

    fn copy_code(
        &mut self,
        button: &NodeRef,
        clipboard: &dyn Clipboard,
    ) -> Result<EventOutcome, DomError> {
        let code = match button.closest(CODE_SNIPPET)? {
            Some(snippet) => snippet
                .query_first(CODE_BODY)?
                .map(|code| code.text_contents())
                .unwrap_or_default(),
            None => String::new(),
        };
        if code.is_empty() {
            return Ok(EventOutcome::Ignored);
        }

        let outcome = match copy_text(clipboard, &code) {
            Ok(()) => EventOutcome::Copied,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to copy code snippet");
                EventOutcome::CopyFailed
            }
        };
        self.flash(button, outcome);
        Ok(outcome)
    }

    /// Show the status label and (re)start the revert timer.
    ///
    /// A button clicked again while flashing keeps its original markup.
    fn flash(&mut self, button: &NodeRef, outcome: EventOutcome) {
        let due = self.clock.now() + self.revert_after;
        match self.reverts.iter_mut().find(|revert| revert.button == *button) {
            Some(revert) => revert.due = due,
            None => self.reverts.push(PendingRevert {
                button: button.clone(),
                markup: button.inner_html(),
                due,
            }),
        }

        let label = if outcome == EventOutcome::Copied {
            &self.labels.copied
        } else {
            &self.labels.failed
        };
        button.set_text(label);
    }
}

/// Flip an accordion header and its panel in lock-step.
fn toggle(header: &NodeRef) -> EventOutcome {
    let expanded = header.attr("aria-expanded").as_deref() == Some("true");
    header.set_attr("aria-expanded", if expanded { "false" } else { "true" });
    if let Some(body) = header.next_element_sibling() {
        body.set_attr("aria-hidden", if expanded { "true" } else { "false" });
    }
    EventOutcome::Toggled {
        expanded: !expanded,
    }
}
