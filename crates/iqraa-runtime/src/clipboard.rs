//! Clipboard capability.

use crate::error::ClipboardError;

/// Clipboard access offered by the surface.
pub trait Clipboard {
    /// Write through the platform clipboard API.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Copy through the legacy path (hidden text field, select, copy command).
    fn legacy_copy(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Surface without any clipboard.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Copy `text`, falling back to the legacy path when the platform write fails.
///
/// # Errors
///
/// Returns the legacy path's error when both paths fail.
pub fn copy_text(clipboard: &dyn Clipboard, text: &str) -> Result<(), ClipboardError> {
    match clipboard.write_text(text) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!(error = %e, "Clipboard write failed, trying legacy copy");
            clipboard.legacy_copy(text)
        }
    }
}
