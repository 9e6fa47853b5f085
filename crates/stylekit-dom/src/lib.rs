//! # StyleKit DOM
//!
//! The element and document model that inline styles live in.
//!
//! Elements carry an ordered attribute list with two write paths:
//!
//! 1. **Notifying writes** (`set_attribute`, `remove_attribute`) record an
//!    [`AttributeMutation`] on the owning document and, when the element is
//!    connected, bump the document's structural cache id.
//! 2. **Silent writes** (`set_attribute_node_silently`,
//!    `remove_attribute_silently`) change the attribute list and nothing else.
//!    They are used when the written text was derived from state the caller
//!    already owns, such as a serialized style declaration.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur in DOM operations.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Unique identifier for a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// Type of DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    Document,
    DocumentType {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        tag_name: String,
        namespace: String,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

/// An attribute node, detached from any element until inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// A recorded change made through a notifying attribute write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMutation {
    pub target: NodeId,
    pub name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Document-wide state shared with every node the document created.
#[derive(Debug, Default)]
pub struct DocumentState {
    cache_id: Cell<u64>,
    mutations: RefCell<Vec<AttributeMutation>>,
}

impl DocumentState {
    /// Current structural cache identifier.
    pub fn cache_id(&self) -> u64 {
        self.cache_id.get()
    }

    /// Invalidate caches keyed on document structure or style.
    pub fn bump_cache_id(&self) -> u64 {
        let next = self.cache_id.get() + 1;
        self.cache_id.set(next);
        trace!(cache_id = next, "Structural cache id bumped");
        next
    }

    fn record(&self, mutation: AttributeMutation) {
        self.mutations.borrow_mut().push(mutation);
    }

    /// Drain the recorded attribute mutations.
    pub fn take_mutations(&self) -> Vec<AttributeMutation> {
        std::mem::take(&mut *self.mutations.borrow_mut())
    }
}

/// A DOM node.
#[derive(Debug)]
pub struct Node {
    /// Unique ID for this node.
    pub id: NodeId,
    /// Node type and associated data.
    pub node_type: NodeType,
    /// Attributes in insertion order (elements only).
    attributes: RefCell<Vec<Attr>>,
    /// The document that created this node.
    owner_document: Weak<DocumentState>,
    /// Parent node (weak reference to avoid cycles).
    parent: RefCell<Option<Weak<Node>>>,
    /// Child nodes.
    children: RefCell<Vec<Rc<Node>>>,
    /// Previous sibling.
    prev_sibling: RefCell<Option<Weak<Node>>>,
    /// Next sibling.
    next_sibling: RefCell<Option<Weak<Node>>>,
}

impl Node {
    /// Create a new node owned by `owner_document`.
    pub fn new(id: NodeId, node_type: NodeType, owner_document: Weak<DocumentState>) -> Rc<Self> {
        Rc::new(Self {
            id,
            node_type,
            attributes: RefCell::new(Vec::new()),
            owner_document,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            prev_sibling: RefCell::new(None),
            next_sibling: RefCell::new(None),
        })
    }

    /// Get the tag name for element nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// The owning document's shared state, if the document is still alive.
    pub fn owner_document(&self) -> Option<Rc<DocumentState>> {
        self.owner_document.upgrade()
    }

    // ==================== Attributes ====================

    /// Get an attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .borrow()
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.clone())
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .borrow()
            .iter()
            .any(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Snapshot of the attribute list in insertion order.
    pub fn attributes(&self) -> Vec<Attr> {
        self.attributes.borrow().clone()
    }

    /// Set an attribute, notifying the owning document.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let old_value = self.set_attribute_node_silently(self.create_attribute(name, value));
        self.notify_attribute_changed(
            name,
            old_value.map(|attr| attr.value),
            Some(value.to_string()),
        );
    }

    /// Remove an attribute, notifying the owning document when it existed.
    pub fn remove_attribute(&self, name: &str) -> Option<Attr> {
        let removed = self.remove_attribute_silently(name)?;
        self.notify_attribute_changed(name, Some(removed.value.clone()), None);
        Some(removed)
    }

    /// Create a detached attribute node.
    pub fn create_attribute(&self, name: &str, value: &str) -> Attr {
        Attr {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }

    /// Insert an attribute node without recording a mutation or touching the
    /// document cache. An existing attribute of the same name is replaced in
    /// place and returned.
    pub fn set_attribute_node_silently(&self, attr: Attr) -> Option<Attr> {
        let mut attributes = self.attributes.borrow_mut();
        match attributes
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&attr.name))
        {
            Some(existing) => Some(std::mem::replace(existing, attr)),
            None => {
                attributes.push(attr);
                None
            }
        }
    }

    /// Remove an attribute without recording a mutation or touching the
    /// document cache.
    pub fn remove_attribute_silently(&self, name: &str) -> Option<Attr> {
        let mut attributes = self.attributes.borrow_mut();
        let index = attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))?;
        Some(attributes.remove(index))
    }

    fn notify_attribute_changed(
        &self,
        name: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        let Some(document) = self.owner_document() else {
            return;
        };
        document.record(AttributeMutation {
            target: self.id,
            name: name.to_ascii_lowercase(),
            old_value,
            new_value,
        });
        if self.is_connected() {
            document.bump_cache_id();
        }
    }

    // ==================== Tree ====================

    /// Get parent node.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Get child nodes.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Get last child.
    pub fn last_child(&self) -> Option<Rc<Node>> {
        self.children.borrow().last().cloned()
    }

    /// Get previous sibling.
    pub fn previous_sibling(&self) -> Option<Rc<Node>> {
        self.prev_sibling
            .borrow()
            .as_ref()
            .and_then(|w| w.upgrade())
    }

    /// Get next sibling.
    pub fn next_sibling(&self) -> Option<Rc<Node>> {
        self.next_sibling
            .borrow()
            .as_ref()
            .and_then(|w| w.upgrade())
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element { .. })
    }

    /// Whether the node's root is a document node.
    pub fn is_connected(&self) -> bool {
        let mut current = match self.parent() {
            Some(parent) => parent,
            None => return matches!(self.node_type, NodeType::Document),
        };
        while let Some(parent) = current.parent() {
            current = parent;
        }
        matches!(current.node_type, NodeType::Document)
    }

    /// Append a child node, detaching it from its previous parent first.
    pub fn append_child(self: &Rc<Self>, child: Rc<Node>) {
        if let Some(old_parent) = child.parent() {
            // The child is known to be in the old parent's list.
            let _ = old_parent.remove_child(&child);
        }

        // Update child's parent
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));

        // Update sibling links
        if let Some(last) = self.last_child() {
            *last.next_sibling.borrow_mut() = Some(Rc::downgrade(&child));
            *child.prev_sibling.borrow_mut() = Some(Rc::downgrade(&last));
        }

        // Add to children
        self.children.borrow_mut().push(child);
    }

    /// Remove a child node.
    pub fn remove_child(&self, child: &Rc<Node>) -> Result<Rc<Node>, DomError> {
        let index = self
            .children
            .borrow()
            .iter()
            .position(|candidate| Rc::ptr_eq(candidate, child))
            .ok_or_else(|| {
                DomError::InvalidOperation(format!("node {} is not a child", child.id.raw()))
            })?;
        let removed = self.children.borrow_mut().remove(index);

        let prev = removed.prev_sibling.borrow_mut().take();
        let next = removed.next_sibling.borrow_mut().take();
        if let Some(prev_node) = prev.as_ref().and_then(|w| w.upgrade()) {
            *prev_node.next_sibling.borrow_mut() = next.clone();
        }
        if let Some(next_node) = next.as_ref().and_then(|w| w.upgrade()) {
            *next_node.prev_sibling.borrow_mut() = prev;
        }
        *removed.parent.borrow_mut() = None;

        Ok(removed)
    }
}

/// A complete DOM document.
pub struct Document {
    /// Root node of the document.
    root: Rc<Node>,
    /// Cache id and mutation records shared with nodes.
    state: Rc<DocumentState>,
    /// All nodes created by this document, indexed by ID.
    nodes: RefCell<HashMap<NodeId, Rc<Node>>>,
    /// Next node ID.
    next_id: Cell<usize>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        let state = Rc::new(DocumentState::default());
        let root = Node::new(NodeId::new(0), NodeType::Document, Rc::downgrade(&state));
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::new(0), root.clone());

        Self {
            root,
            state,
            nodes: RefCell::new(nodes),
            next_id: Cell::new(1),
        }
    }

    /// Parse HTML and create a document.
    pub fn parse_html(html: &str) -> Result<Self, DomError> {
        debug!(len = html.len(), "Parsing HTML");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| DomError::ParseError(e.to_string()))?;

        let doc = Document::new();
        doc.convert_rcdom(&dom.document, &doc.root.clone());

        debug!(node_count = doc.nodes.borrow().len(), "HTML parsed");
        Ok(doc)
    }

    fn convert_rcdom(&self, handle: &Handle, parent: &Rc<Node>) {
        for child_handle in handle.children.borrow().iter() {
            let mut attributes = Vec::new();
            let node_type = match &child_handle.data {
                NodeData::Document => continue, // Skip document node itself
                NodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                } => NodeType::DocumentType {
                    name: name.to_string(),
                    public_id: public_id.to_string(),
                    system_id: system_id.to_string(),
                },
                NodeData::Element { name, attrs, .. } => {
                    for attr in attrs.borrow().iter() {
                        attributes.push(Attr {
                            name: attr.name.local.to_string(),
                            value: attr.value.to_string(),
                        });
                    }
                    NodeType::Element {
                        tag_name: name.local.to_string(),
                        namespace: name.ns.to_string(),
                    }
                }
                NodeData::Text { contents } => NodeType::Text(contents.borrow().to_string()),
                NodeData::Comment { contents } => NodeType::Comment(contents.to_string()),
                NodeData::ProcessingInstruction { target, contents } => {
                    NodeType::ProcessingInstruction {
                        target: target.to_string(),
                        data: contents.to_string(),
                    }
                }
            };

            let node = self.create_node(node_type);
            *node.attributes.borrow_mut() = attributes;
            parent.append_child(node.clone());

            // Recurse for children
            self.convert_rcdom(child_handle, &node);
        }
    }

    fn create_node(&self, node_type: NodeType) -> Rc<Node> {
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let node = Node::new(id, node_type, Rc::downgrade(&self.state));
        self.nodes.borrow_mut().insert(id, node.clone());
        node
    }

    /// Create a detached HTML element.
    pub fn create_element(&self, tag_name: &str) -> Rc<Node> {
        self.create_node(NodeType::Element {
            tag_name: tag_name.to_ascii_lowercase(),
            namespace: "http://www.w3.org/1999/xhtml".to_string(),
        })
    }

    /// Get the document root.
    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    /// Shared document state (cache id, mutation records).
    pub fn state(&self) -> &Rc<DocumentState> {
        &self.state
    }

    /// Current structural cache identifier.
    pub fn cache_id(&self) -> u64 {
        self.state.cache_id()
    }

    /// Invalidate caches keyed on document structure or style.
    pub fn bump_cache_id(&self) -> u64 {
        self.state.bump_cache_id()
    }

    /// Drain the attribute mutations recorded by notifying writes.
    pub fn take_mutations(&self) -> Vec<AttributeMutation> {
        self.state.take_mutations()
    }

    /// Get the document element (<html>).
    pub fn document_element(&self) -> Option<Rc<Node>> {
        self.root
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("html"))
    }

    /// Get the <body> element.
    pub fn body(&self) -> Option<Rc<Node>> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("body"))
    }

    /// Get a connected element by its `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<Node>> {
        let mut found = None;
        self.traverse(|node| {
            if found.is_none() && node.get_attribute("id").as_deref() == Some(id) {
                found = Some(node.clone());
            }
        });
        found
    }

    /// Get any node this document created, connected or not.
    pub fn get_node(&self, id: NodeId) -> Option<Rc<Node>> {
        self.nodes.borrow().get(&id).cloned()
    }

    /// Traverse all connected nodes depth-first.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Rc<Node>),
    {
        Self::traverse_node(&self.root, &mut callback);
    }

    fn traverse_node<F>(node: &Rc<Node>, callback: &mut F)
    where
        F: FnMut(&Rc<Node>),
    {
        callback(node);
        for child in node.children() {
            Self::traverse_node(&child, callback);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_attribute_order() {
        let html = r#"<html><body><p id="main" style="color: red" class="x">Hi</p></body></html>"#;
        let doc = Document::parse_html(html).unwrap();

        let main = doc.get_element_by_id("main").unwrap();
        assert_eq!(main.tag_name(), Some("p"));
        assert_eq!(main.get_attribute("style"), Some("color: red".to_string()));
        let names: Vec<_> = main.attributes().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["id", "style", "class"]);
        assert!(main.is_connected());
    }

    #[test]
    fn test_connection_follows_tree() {
        let doc = Document::new();
        let div = doc.create_element("div");
        assert!(!div.is_connected());

        doc.root().append_child(div.clone());
        assert!(div.is_connected());

        doc.root().remove_child(&div).unwrap();
        assert!(!div.is_connected());
        assert!(div.parent().is_none());
    }

    #[test]
    fn test_nested_connection() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        outer.append_child(inner.clone());
        assert!(!inner.is_connected());

        doc.root().append_child(outer);
        assert!(inner.is_connected());
    }

    #[test]
    fn test_notifying_write_records_and_bumps() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.root().append_child(div.clone());

        div.set_attribute("title", "a");
        div.set_attribute("title", "b");
        assert_eq!(doc.cache_id(), 2);

        let mutations = doc.take_mutations();
        assert_eq!(mutations.len(), 2);
        assert_eq!(mutations[1].old_value, Some("a".to_string()));
        assert_eq!(mutations[1].new_value, Some("b".to_string()));

        assert!(div.remove_attribute("title").is_some());
        assert!(div.remove_attribute("title").is_none());
        assert_eq!(doc.cache_id(), 3);
        assert_eq!(doc.take_mutations().len(), 1);
    }

    #[test]
    fn test_detached_write_does_not_bump() {
        let doc = Document::new();
        let div = doc.create_element("div");
        div.set_attribute("title", "a");
        assert_eq!(doc.cache_id(), 0);
        assert_eq!(doc.take_mutations().len(), 1);
    }

    #[test]
    fn test_silent_writes() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.root().append_child(div.clone());

        let attr = div.create_attribute("STYLE", "color: red;");
        assert_eq!(attr.name, "style");
        assert!(div.set_attribute_node_silently(attr).is_none());
        assert_eq!(div.get_attribute("style"), Some("color: red;".to_string()));

        let replaced = div
            .set_attribute_node_silently(div.create_attribute("style", "color: blue;"))
            .unwrap();
        assert_eq!(replaced.value, "color: red;");

        assert!(div.remove_attribute_silently("style").is_some());
        assert!(!div.has_attribute("style"));
        assert_eq!(doc.cache_id(), 0);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_remove_child_errors_for_non_child() {
        let doc = Document::new();
        let div = doc.create_element("div");
        assert!(matches!(
            doc.root().remove_child(&div),
            Err(DomError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_sibling_links_after_removal() {
        let doc = Document::new();
        let body = doc.create_element("body");
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        let c = doc.create_element("p");
        body.append_child(a.clone());
        body.append_child(b.clone());
        body.append_child(c.clone());

        body.remove_child(&b).unwrap();
        assert_eq!(a.next_sibling().map(|n| n.id), Some(c.id));
        assert_eq!(c.previous_sibling().map(|n| n.id), Some(a.id));
        assert_eq!(doc.get_node(b.id).map(|n| n.id), Some(b.id));
    }
}
