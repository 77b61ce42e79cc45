//! Element helpers on [`NodeRef`].

use kuchikikiki::NodeRef;
use kuchikikiki::traits::NodeIterator;

use crate::DomError;
use crate::fragment::parse_fragment;
use crate::style;

/// Extension methods for reading and mutating element nodes.
///
/// Attribute helpers are no-ops (or return `None`) on non-element nodes.
pub trait NodeExt {
    /// Lowercase local tag name, `None` for non-elements.
    fn tag_name(&self) -> Option<String>;

    /// Whether this node is an element with one of the given tag names.
    fn is_tag(&self, names: &[&str]) -> bool;

    /// Attribute value.
    fn attr(&self, name: &str) -> Option<String>;

    /// Set an attribute, replacing any previous value.
    fn set_attr(&self, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attr(&self, name: &str);

    /// Whether the `class` attribute contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Add a class token (no duplicate).
    fn add_class(&self, class: &str);

    /// Remove a class token.
    fn remove_class(&self, class: &str);

    /// Set one declaration of the inline `style` attribute.
    fn set_style_property(&self, property: &str, value: &str);

    /// Serialized markup of the children.
    fn inner_html(&self) -> String;

    /// Serialized markup of the node itself.
    fn outer_html(&self) -> String;

    /// Replace the children with parsed `markup`.
    fn set_inner_html(&self, markup: &str);

    /// Replace the children with a single text node.
    fn set_text(&self, text: &str);

    /// Replace the node with parsed `markup` and return the inserted nodes.
    ///
    /// The original node is detached; handles to it stay valid but detached.
    fn replace_with_html(&self, markup: &str) -> Vec<NodeRef>;

    /// Whether the node is still connected to a document.
    fn is_attached(&self) -> bool;

    /// First element at or under this node matching `selectors`.
    fn query_first(&self, selectors: &str) -> Result<Option<NodeRef>, DomError>;

    /// All elements at or under this node matching `selectors`, in tree order.
    fn query_all(&self, selectors: &str) -> Result<Vec<NodeRef>, DomError>;

    /// Nearest inclusive ancestor matching `selectors`.
    fn closest(&self, selectors: &str) -> Result<Option<NodeRef>, DomError>;

    /// Next sibling that is an element.
    fn next_element_sibling(&self) -> Option<NodeRef>;
}

impl NodeExt for NodeRef {
    fn tag_name(&self) -> Option<String> {
        self.as_element()
            .map(|element| (*element.name.local).to_ascii_lowercase())
    }

    fn is_tag(&self, names: &[&str]) -> bool {
        self.as_element()
            .is_some_and(|element| names.iter().any(|n| (*element.name.local).eq_ignore_ascii_case(n)))
    }

    fn attr(&self, name: &str) -> Option<String> {
        let element = self.as_element()?;
        element.attributes.borrow().get(name).map(str::to_owned)
    }

    fn set_attr(&self, name: &str, value: &str) {
        if let Some(element) = self.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert(name, value.to_owned());
        }
    }

    fn remove_attr(&self, name: &str) {
        if let Some(element) = self.as_element() {
            element.attributes.borrow_mut().remove(name);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    fn add_class(&self, class: &str) {
        if self.as_element().is_none() || self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_owned(),
        };
        self.set_attr("class", &classes);
    }

    fn remove_class(&self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        self.set_attr("class", &remaining.join(" "));
    }

    fn set_style_property(&self, property: &str, value: &str) {
        if self.as_element().is_none() {
            return;
        }
        let current = self.attr("style").unwrap_or_default();
        self.set_attr("style", &style::with_property(&current, property, value));
    }

    fn inner_html(&self) -> String {
        self.children().map(|child| serialize_node(&child)).collect()
    }

    fn outer_html(&self) -> String {
        serialize_node(self)
    }

    fn set_inner_html(&self, markup: &str) {
        for child in self.children().collect::<Vec<_>>() {
            child.detach();
        }
        for node in parse_fragment(markup) {
            self.append(node);
        }
    }

    fn set_text(&self, text: &str) {
        for child in self.children().collect::<Vec<_>>() {
            child.detach();
        }
        self.append(NodeRef::new_text(text));
    }

    fn replace_with_html(&self, markup: &str) -> Vec<NodeRef> {
        let nodes = parse_fragment(markup);
        for node in &nodes {
            self.insert_before(node.clone());
        }
        self.detach();
        nodes
    }

    fn is_attached(&self) -> bool {
        self.inclusive_ancestors()
            .any(|ancestor| ancestor.as_document().is_some())
    }

    fn query_first(&self, selectors: &str) -> Result<Option<NodeRef>, DomError> {
        Ok(self.query_all(selectors)?.into_iter().next())
    }

    fn query_all(&self, selectors: &str) -> Result<Vec<NodeRef>, DomError> {
        let matches = self
            .select(selectors)
            .map_err(|()| DomError::InvalidSelector(selectors.to_owned()))?;
        Ok(matches.map(|element| element.as_node().clone()).collect())
    }

    fn closest(&self, selectors: &str) -> Result<Option<NodeRef>, DomError> {
        let mut matches = self
            .inclusive_ancestors()
            .select(selectors)
            .map_err(|()| DomError::InvalidSelector(selectors.to_owned()))?;
        Ok(matches.next().map(|element| element.as_node().clone()))
    }

    fn next_element_sibling(&self) -> Option<NodeRef> {
        self.following_siblings()
            .find(|sibling| sibling.as_element().is_some())
    }
}

/// Serialize a node (including itself) to markup.
pub(crate) fn serialize_node(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    if let Err(e) = node.serialize(&mut buf) {
        tracing::debug!(error = %e, "Failed to serialize node");
    }
    String::from_utf8(buf).unwrap_or_default()
}
