//! Parsed page document.

use kuchikikiki::NodeRef;
use kuchikikiki::traits::TendrilSink;

use crate::node::{NodeExt, serialize_node};
use crate::DomError;

/// A parsed HTML page.
///
/// The tree is reference counted: [`NodeRef`] handles obtained from queries stay
/// valid while the document is mutated, and a handle whose node was replaced
/// simply reports itself as detached (see [`NodeExt::is_attached`]).
#[derive(Debug)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse a complete HTML document.
    ///
    /// Follows the HTML5 parsing algorithm, so missing `<html>`, `<head>` and
    /// `<body>` elements are synthesised.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchikikiki::parse_html().one(html),
        }
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// The `<body>` element, if the tree has one.
    #[must_use]
    pub fn body(&self) -> Option<NodeRef> {
        self.root
            .select_first("body")
            .ok()
            .map(|body| body.as_node().clone())
    }

    /// First element in the document matching `selectors`.
    pub fn query_first(&self, selectors: &str) -> Result<Option<NodeRef>, DomError> {
        self.root.query_first(selectors)
    }

    /// All elements in the document matching `selectors`, in tree order.
    pub fn query_all(&self, selectors: &str) -> Result<Vec<NodeRef>, DomError> {
        self.root.query_all(selectors)
    }

    /// Serialize the whole document back to markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        serialize_node(&self.root)
    }
}
