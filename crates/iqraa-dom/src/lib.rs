//! Live HTML document adapter.
//!
//! Everything the content engine does to a page goes through this crate: the
//! engines decide *what* to write, this crate performs the mutation on a
//! parsed, reference-counted DOM tree.
//!
//! # Architecture
//!
//! - [`Document`]: owns the parsed tree and serializes it back to markup
//! - [`NodeExt`]: attribute, class, style and markup helpers on [`NodeRef`]
//! - [`parse_fragment`] / [`fragment_text`]: parse detached markup snippets
//!
//! # Example
//!
//! ```
//! use iqraa_dom::{Document, NodeExt};
//!
//! let doc = Document::parse("<div class=\"post-body\"><blockquote>hi</blockquote></div>");
//! let quote = doc.query_first("blockquote").unwrap().unwrap();
//! quote.replace_with_html("<p>bye</p>");
//! assert!(doc.to_html().contains("<p>bye</p>"));
//! ```

mod document;
mod error;
mod fragment;
mod node;
mod style;

pub use document::Document;
pub use error::DomError;
pub use fragment::{fragment_text, parse_fragment};
pub use kuchikikiki::NodeRef;
pub use node::NodeExt;
