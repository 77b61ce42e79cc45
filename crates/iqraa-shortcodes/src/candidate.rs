//! Candidate element resolution.
//!
//! A candidate is resolved exactly once: it starts [`CandidateState::Unprocessed`]
//! and ends either [`CandidateState::Rewritten`] with widget markup or
//! [`CandidateState::Rejected`]. Resolution only looks at the captured text and
//! markup; applying the outcome to a live tree is the engine's job.

use crate::catalog::{
    ButtonKind, Catalog, DYNAMIC_HIDE_PREFIXES, HideTarget, MarkerDefinition, MarkerKind,
};
use crate::text::{markup_to_text_keep_lines, normalize, split_on_marker, strip_marker};
use crate::widget::{Widget, WidgetOptions};
use crate::youtube::youtube_id;

/// Content captured from a candidate element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawContent {
    /// Normalized visible text.
    pub text: String,
    /// Inner markup, verbatim.
    pub markup: String,
}

impl RawContent {
    /// Capture content, normalizing the visible text.
    #[must_use]
    pub fn new(text: &str, markup: impl Into<String>) -> Self {
        Self {
            text: normalize(text),
            markup: markup.into(),
        }
    }
}

/// Lifecycle of a candidate element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateState {
    /// Not yet examined.
    Unprocessed(RawContent),
    /// Matched; the element is replaced by this markup.
    Rewritten(String),
    /// Examined without a match; the element is kept and flagged.
    Rejected,
}

impl CandidateState {
    /// Whether the state is final.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unprocessed(_))
    }
}

/// Which matching rules apply to a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateKind {
    /// Block quote: messages, buttons, code, video, PDF, accordion.
    Quote,
    /// Strike-through: hide/layout directives.
    Strike,
}

/// Resolve a candidate to its terminal state.
///
/// Terminal states are returned unchanged.
#[must_use]
pub fn resolve(
    state: CandidateState,
    kind: CandidateKind,
    catalog: &Catalog,
    options: &WidgetOptions,
) -> CandidateState {
    let raw = match state {
        CandidateState::Unprocessed(raw) => raw,
        terminal => return terminal,
    };
    let widget = match kind {
        CandidateKind::Quote => match_quote(catalog, &raw),
        CandidateKind::Strike => match_strike(catalog, &raw),
    };
    match widget {
        Some(widget) => CandidateState::Rewritten(widget.render(options)),
        None => CandidateState::Rejected,
    }
}

/// First quote-block widget matching `raw`, in catalog precedence order.
#[must_use]
pub fn match_quote(catalog: &Catalog, raw: &RawContent) -> Option<Widget> {
    if raw.text.is_empty() {
        return None;
    }
    let lowered = raw.text.to_lowercase();

    catalog.quote_markers().iter().find_map(|marker| {
        marker
            .match_forms
            .iter()
            .filter(|form| lowered.contains(&form.to_lowercase()))
            .find_map(|form| capture(marker, form, raw))
    })
}

/// Build the widget for one present marker form, or `None` when the
/// content it requires is missing.
fn capture(marker: &MarkerDefinition, form: &str, raw: &RawContent) -> Option<Widget> {
    match marker.kind {
        MarkerKind::Message { severity, titled } => Some(Widget::Message {
            severity,
            titled,
            content: strip_marker(&raw.markup, form),
        }),
        MarkerKind::Button(kind) => capture_button(kind, form, raw),
        MarkerKind::Code(language) => Some(Widget::Code {
            language,
            code: markup_to_text_keep_lines(&strip_marker(&raw.markup, form)),
        }),
        MarkerKind::Video => {
            let reference = flattened_remainder(raw, form);
            (!reference.is_empty()).then(|| Widget::Video {
                id: youtube_id(&reference),
            })
        }
        MarkerKind::Pdf => {
            let url = flattened_remainder(raw, form);
            (!url.is_empty()).then_some(Widget::Pdf { url })
        }
        MarkerKind::Accordion => capture_accordion(form, raw),
        MarkerKind::Hide(_) => None,
    }
}

/// Either `URL -marker- label` or `-marker- URL label`; the label is optional.
fn capture_button(kind: ButtonKind, form: &str, raw: &RawContent) -> Option<Widget> {
    let mut parts = split_on_marker(&raw.text, form).into_iter();
    let before = parts.next().unwrap_or_default();
    let after = parts.next().unwrap_or_default();

    let (url, label) = if before.is_empty() {
        match after.split_once(' ') {
            Some((url, label)) => (url.to_owned(), label.to_owned()),
            None => (after, String::new()),
        }
    } else {
        (before, after)
    };
    if url.is_empty() {
        return None;
    }

    let label = if label.is_empty() {
        Catalog::default_button_label(kind).to_owned()
    } else {
        label
    };
    Some(Widget::Button { kind, url, label })
}

/// Markup split on the marker: the text before the first occurrence is the
/// title, everything after it (later occurrences included, as separators) is
/// the body.
fn capture_accordion(form: &str, raw: &RawContent) -> Option<Widget> {
    let mut parts = raw.markup.split(form);
    let title_markup = parts.next().unwrap_or_default().trim();
    let body = parts.collect::<Vec<_>>().join(form).trim().to_owned();
    let title = normalize(&iqraa_dom::fragment_text(title_markup));
    (!title.is_empty()).then_some(Widget::Accordion { title, body })
}

fn flattened_remainder(raw: &RawContent, form: &str) -> String {
    normalize(&markup_to_text_keep_lines(&strip_marker(&raw.markup, form)))
}

/// Hide/layout widget for a strike-through element.
#[must_use]
pub fn match_strike(catalog: &Catalog, raw: &RawContent) -> Option<Widget> {
    let fixed = catalog.strike_markers().iter().find_map(|marker| {
        let MarkerKind::Hide(target) = marker.kind else {
            return None;
        };
        marker
            .match_forms
            .iter()
            .any(|phrase| raw.text.contains(phrase.as_str()))
            .then_some(target)
    });

    if let Some(target) = fixed {
        return Some(match target {
            HideTarget::Selector(selector) => Widget::Hide {
                selectors: selector.to_owned(),
            },
            HideTarget::FullWidth => Widget::FullWidth,
        });
    }

    if !DYNAMIC_HIDE_PREFIXES
        .iter()
        .any(|prefix| raw.text.starts_with(prefix))
    {
        return None;
    }
    let selectors = raw
        .text
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    (!selectors.is_empty()).then(|| Widget::Hide {
        selectors: selectors.to_owned(),
    })
}
