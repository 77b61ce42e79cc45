//! Colored terminal output utilities.

use console::{Style, Term, style};

/// Status printer on stderr, so rendered markup can be piped from stdout.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn line(&self, text: &str, look: &Style) {
        let _ = self.term.write_line(&look.apply_to(text).to_string());
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg, &Style::new());
    }

    /// Pass summary (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(msg, &Style::new().green());
    }

    /// Failure (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(msg, &Style::new().red());
    }

    /// Marker family heading (cyan bold).
    pub(crate) fn heading(&self, msg: &str) {
        self.line(msg, &Style::new().cyan().bold());
    }

    /// One catalog entry: key in yellow, forms as given.
    pub(crate) fn entry(&self, key: &str, forms: &str) {
        let _ = self
            .term
            .write_line(&format!("  {:<20} {forms}", style(key).yellow()));
    }

    /// Secondary detail (dimmed).
    pub(crate) fn detail(&self, msg: &str) {
        self.line(msg, &Style::new().dim());
    }
}
