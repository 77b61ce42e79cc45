//! Marker-driven content rewriting.
//!
//! Authors embed hyphen-delimited markers (`-success-`, `-download-`,
//! `-أكورديون-`) in block quotes and strike-through text. This crate recognizes
//! them and replaces the element with widget markup.
//!
//! # Architecture
//!
//! - [`normalize`]: canonical text every match decision is made on
//! - [`Catalog`]: immutable marker table in precedence order
//! - [`resolve`]: pure candidate state machine (no live tree involved)
//! - [`Widget`]: rendered markup per marker kind
//! - [`ShortcodeEngine`]: applies resolutions to a live document scope
//!
//! # Example
//!
//! ```
//! use iqraa_shortcodes::{Catalog, RawContent, Widget, match_quote};
//!
//! let catalog = Catalog::standard();
//! let raw = RawContent::new("-pdf- https://x.test/a.pdf", "-pdf- https://x.test/a.pdf");
//! assert_eq!(
//!     match_quote(&catalog, &raw),
//!     Some(Widget::Pdf { url: "https://x.test/a.pdf".to_owned() })
//! );
//! ```

mod candidate;
mod catalog;
mod engine;
mod text;
mod widget;
mod youtube;

pub use candidate::{CandidateKind, CandidateState, RawContent, match_quote, match_strike, resolve};
pub use catalog::{
    ButtonKind, Catalog, CodeLanguage, DYNAMIC_HIDE_PREFIXES, HideTarget, MarkerDefinition,
    MarkerFamily, MarkerKind, Severity,
};
pub use engine::{DEFAULT_DONE_ATTR, PassStats, ShortcodeEngine};
pub use text::{escape_html, markup_to_text_keep_lines, normalize, split_on_marker, strip_marker};
pub use widget::{DEFAULT_COPY_ICON, DEFAULT_COPY_LABEL, Widget, WidgetOptions};
pub use youtube::youtube_id;
