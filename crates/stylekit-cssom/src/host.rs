//! The element side of a bound declaration.

use stylekit_dom::{Attr, Node};

/// Name of the attribute inline styles live in.
pub const STYLE_ATTRIBUTE: &str = "style";

/// An element that can host a live style declaration.
///
/// Writes made through this trait must not notify attribute observers: the
/// text written was derived from the declaration itself, so notifying would
/// feed the change back into it.
pub trait StyleAttributeHost {
    /// A detached attribute node.
    type Attribute;

    /// Current text of an attribute, if present.
    fn read_attribute(&self, name: &str) -> Option<String>;

    /// Create a detached attribute node.
    fn create_attribute(&self, name: &str, value: &str) -> Self::Attribute;

    /// Insert (or replace) an attribute without notification.
    fn insert_attribute_silently(&self, attribute: Self::Attribute);

    /// Remove an attribute without notification.
    fn remove_attribute_silently(&self, name: &str);

    /// Whether the element is part of a connected document.
    fn is_connected(&self) -> bool;

    /// Bump the owning document's structural cache identifier.
    fn bump_structural_cache_id(&self);
}

impl StyleAttributeHost for Node {
    type Attribute = Attr;

    fn read_attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn create_attribute(&self, name: &str, value: &str) -> Attr {
        Node::create_attribute(self, name, value)
    }

    fn insert_attribute_silently(&self, attribute: Attr) {
        self.set_attribute_node_silently(attribute);
    }

    fn remove_attribute_silently(&self, name: &str) {
        Node::remove_attribute_silently(self, name);
    }

    fn is_connected(&self) -> bool {
        Node::is_connected(self)
    }

    fn bump_structural_cache_id(&self) {
        if let Some(document) = self.owner_document() {
            document.bump_cache_id();
        }
    }
}
