//! Runtime error types.

use iqraa_dom::DomError;

/// A pass over the page scope could not complete.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

/// A clipboard write did not happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// The surface offers no such clipboard path.
    #[error("Clipboard unavailable")]
    Unavailable,
    /// The clipboard refused the write.
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}
