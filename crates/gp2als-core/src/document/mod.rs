//! Ordered element tree used for Live set documents.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. A parent keeps its children in document order, which matters
//! to Live: the position of a section among its siblings is part of the
//! format.
//!
//! Removing a child detaches it from its parent. The detached subtree stays
//! in the arena but is unreachable from the root and is never written.

mod ids;
mod xml;

use std::ops::Index;

pub use ids::NodeId;

/// A single element: name, ordered attributes, optional text, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An XML document held as an arena of [`Element`]s with a single root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Create a document containing only an empty root element.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Element::new(root_name)],
            root: NodeId::new(0),
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Names of the children of `parent`, in order.
    #[must_use]
    pub fn child_names(&self, parent: NodeId) -> Vec<&str> {
        self[parent]
            .children
            .iter()
            .map(|&child| self[child].name())
            .collect()
    }

    /// First direct child of `parent` named `name`.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.position(parent, name)
            .map(|index| self[parent].children[index])
    }

    /// Index, among the children of `parent`, of the first child named `name`.
    #[must_use]
    pub fn position(&self, parent: NodeId, name: &str) -> Option<usize> {
        self[parent]
            .children
            .iter()
            .position(|&child| self[child].name == name)
    }

    /// Append a new empty element as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let index = self[parent].children.len();
        self.insert_child(parent, index, name)
    }

    /// Insert a new empty element at `index` among the children of `parent`.
    ///
    /// An `index` past the end appends.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        name: impl Into<String>,
    ) -> NodeId {
        let id = self.alloc(Element::new(name));
        let children = &mut self.nodes[parent.index()].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    /// Detach `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent.index()].children;
        match children.iter().position(|&c| c == child) {
            Some(index) => {
                children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set an attribute, replacing an existing value in place so attribute
    /// order is preserved.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        let value = value.into();
        let attributes = &mut self.nodes[id.index()].attributes;
        if let Some(slot) = attributes.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            attributes.push((key.to_string(), value));
        }
    }

    /// Append text to the element's text content.
    pub fn push_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.index()]
            .text
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    /// Structural equality of the subtree at `a` in `self` and the subtree at
    /// `b` in `other`: names, attributes, text and children, recursively.
    #[must_use]
    pub fn same_subtree(&self, a: NodeId, other: &Document, b: NodeId) -> bool {
        let left = &self[a];
        let right = &other[b];
        left.name == right.name
            && left.attributes == right.attributes
            && left.text == right.text
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(&x, &y)| self.same_subtree(x, other, y))
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(element);
        id
    }
}

impl Index<NodeId> for Document {
    type Output = Element;

    fn index(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }
}
