//! DOM adapter error types.

/// Errors raised by document queries.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The selector list could not be compiled.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
