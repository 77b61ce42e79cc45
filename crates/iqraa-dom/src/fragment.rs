//! Parsing of detached markup snippets.

use kuchikikiki::NodeRef;
use kuchikikiki::traits::TendrilSink;

/// Parse a markup snippet into detached top-level nodes.
///
/// The snippet is parsed as the content of a `<body>` element, so elements that
/// would normally be hoisted into `<head>` (such as `<style>`) stay in the
/// returned list in source order.
pub fn parse_fragment(markup: &str) -> Vec<NodeRef> {
    let document = kuchikikiki::parse_html().one(format!("<body>{markup}"));
    let Ok(body) = document.select_first("body") else {
        return Vec::new();
    };
    let nodes: Vec<NodeRef> = body.as_node().children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Text content of a markup snippet, like assigning it to a detached
/// element's `innerHTML` and reading `textContent`.
pub fn fragment_text(markup: &str) -> String {
    parse_fragment(markup)
        .iter()
        .map(NodeRef::text_contents)
        .collect()
}
