#![forbid(unsafe_code)]

//! In-memory document tree.
//!
//! The document is an arena of element nodes. Each node carries a tag,
//! ordered attributes, its own text, a form value, and child links. Elements
//! are addressed from outside by their `id` attribute, which is the contract
//! between markup and behavior.
//!
//! # Invariants
//!
//! 1. `NodeId`s are minted only by [`Document::create`] and never reused.
//! 2. A node has at most one parent; `append_child` detaches from the old one.
//! 3. The id index only resolves elements connected to the root.
//! 4. [`Document::reorder_children`] permutes children; it never adds or drops.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing element | `require` on an id not in the tree | `DomError::MissingElement` |
//! | Cycle | Appending an ancestor under its descendant | `DomError::HierarchyCycle` |
//! | Bad permutation | Reorder list differs from current children | `DomError::InvalidReorder` |

use std::fmt;

use ahash::AHashMap;

use crate::focus;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Errors from document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// No connected element carries this id.
    MissingElement(String),
    /// The append would make a node its own ancestor.
    HierarchyCycle { parent: NodeId, child: NodeId },
    /// The proposed order is not a permutation of the current children.
    InvalidReorder { parent: NodeId },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(id) => write!(f, "no element with id '{id}'"),
            Self::HierarchyCycle { parent, child } => write!(
                f,
                "cannot append node {} under its descendant {}",
                child.0, parent.0
            ),
            Self::InvalidReorder { parent } => {
                write!(f, "reorder of node {} is not a permutation", parent.0)
            }
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            value: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The page document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    ids: AHashMap<String, NodeId>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an `html` root and an empty `body`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::new("html")],
            ids: AHashMap::new(),
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
        };
        let body = doc.create("body");
        doc.nodes[body.0].parent = Some(doc.root);
        doc.nodes[doc.root.0].children.push(body);
        doc.body = body;
        doc
    }

    /// The `html` root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `body` element.
    #[inline]
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever created (connected or not).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Construction ---

    /// Create a detached element.
    pub fn create(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag));
        id
    }

    /// Start building a detached element.
    pub fn element(&mut self, tag: &str) -> ElementBuilder<'_> {
        let node = self.create(tag);
        ElementBuilder { doc: self, node }
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.contains(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Replace the children of `parent` with the same set in a new order.
    pub fn reorder_children(&mut self, parent: NodeId, order: &[NodeId]) -> Result<(), DomError> {
        let current = &self.nodes[parent.0].children;
        if current.len() != order.len() {
            return Err(DomError::InvalidReorder { parent });
        }
        let mut a = current.clone();
        let mut b = order.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return Err(DomError::InvalidReorder { parent });
        }
        self.nodes[parent.0].children = order.to_vec();
        Ok(())
    }

    // --- Lookup ---

    /// Find a connected element by its `id` attribute.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids
            .get(id)
            .copied()
            .filter(|&node| self.is_connected(node))
    }

    /// Like [`get_element_by_id`](Self::get_element_by_id), but missing
    /// elements are an error.
    pub fn require(&self, id: &str) -> Result<NodeId, DomError> {
        self.get_element_by_id(id)
            .ok_or_else(|| DomError::MissingElement(id.to_owned()))
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// The element's `id` attribute, if any.
    #[must_use]
    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    // --- Tree ---

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Child elements with the given tag.
    #[must_use]
    pub fn children_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.tag(c).eq_ignore_ascii_case(tag))
            .collect()
    }

    /// Ancestors of `node`, nearest first (excluding `node`).
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// All descendants of `node` in document (pre-)order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether `node` is attached to the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    // --- Attributes ---

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Whether the attribute is present with exactly this value.
    #[must_use]
    pub fn attr_is(&self, node: NodeId, name: &str, value: &str) -> bool {
        self.attr(node, name) == Some(value)
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        &self.nodes[node.0].attributes
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name == "id" {
            if let Some(old) = self.attr(node, "id").map(str::to_owned) {
                self.ids.remove(&old);
            }
            self.ids.insert(value.clone(), node);
        }
        let attrs = &mut self.nodes[node.0].attributes;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => attrs.push((name.to_owned(), value)),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> bool {
        if name == "id"
            && let Some(old) = self.attr(node, "id").map(str::to_owned)
        {
            self.ids.remove(&old);
        }
        let attrs = &mut self.nodes[node.0].attributes;
        let before = attrs.len();
        attrs.retain(|(k, _)| k != name);
        attrs.len() != before
    }

    /// Set (as an empty boolean attribute) or remove `name`.
    pub fn toggle_attr(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            if !self.has_attr(node, name) {
                self.set_attr(node, name, "");
            }
        } else {
            self.remove_attr(node, name);
        }
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|x| x == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let next = match self.attr(node, "class") {
            Some(c) if !c.trim().is_empty() => format!("{} {class}", c.trim()),
            _ => class.to_owned(),
        };
        self.set_attr(node, "class", next);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(current) = self.attr(node, "class") else {
            return;
        };
        let next: Vec<&str> = current.split_whitespace().filter(|&c| c != class).collect();
        let next = next.join(" ");
        self.set_attr(node, "class", next);
    }

    // --- Text and values ---

    /// Concatenated text of `node` and all its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.nodes[node.0].text.clone();
        for n in self.descendants(node) {
            out.push_str(&self.nodes[n.0].text);
        }
        out
    }

    /// Text as assistive technology reads it: `aria-hidden="true"` subtrees
    /// are skipped and whitespace is collapsed.
    #[must_use]
    pub fn accessible_text(&self, node: NodeId) -> String {
        let mut raw = String::new();
        self.collect_accessible(node, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_accessible(&self, node: NodeId, out: &mut String) {
        if self.attr_is(node, "aria-hidden", "true") {
            return;
        }
        out.push(' ');
        out.push_str(&self.nodes[node.0].text);
        for &child in self.children(node) {
            self.collect_accessible(child, out);
        }
    }

    /// Replace all content of `node` with `text`. Children are detached.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
            if self.focused.is_some_and(|f| self.contains(child, f)) {
                self.focused = None;
            }
        }
        self.nodes[node.0].text = text.into();
    }

    /// Current form value of a control.
    #[must_use]
    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.nodes[node.0].value = value.into();
    }

    // --- Focus ---

    /// The focused element, if any element other than the body has focus.
    #[inline]
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The focused element, falling back to the body.
    #[must_use]
    pub fn active_element(&self) -> NodeId {
        self.focused.unwrap_or(self.body)
    }

    /// Move focus to `node`. Returns `false` (leaving focus unchanged) when
    /// the element cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node) || !focus::is_focusable(self, node) {
            return false;
        }
        self.focused = Some(node);
        #[cfg(feature = "tracing")]
        tracing::trace!(node = node.0, id = ?self.id_of(node), "focus moved");
        true
    }

    /// Drop focus back to the body.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // --- Snapshot ---

    /// Capture every connected element that has an `id`, in document order.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        let elements = self
            .descendants(self.root)
            .into_iter()
            .filter_map(|n| {
                let id = self.id_of(n)?.to_owned();
                Some(ElementSnapshot {
                    id,
                    tag: self.tag(n).to_owned(),
                    attributes: self
                        .attributes(n)
                        .iter()
                        .filter(|(k, _)| k != "id")
                        .cloned()
                        .collect(),
                    text: self.text_content(n),
                    value: self.value(n).to_owned(),
                })
            })
            .collect();
        DocumentSnapshot {
            focused: self.focused.and_then(|f| self.id_of(f)).map(str::to_owned),
            elements,
        }
    }
}

/// Serializable view of the id-addressed elements of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentSnapshot {
    pub focused: Option<String>,
    pub elements: Vec<ElementSnapshot>,
}

impl DocumentSnapshot {
    /// Find an element snapshot by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// One element in a [`DocumentSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementSnapshot {
    pub id: String,
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub value: String,
}

/// Fluent builder for a new element.
///
/// ```
/// use beacon_core::Document;
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let button = doc
///     .element("button")
///     .id("save")
///     .attr("type", "button")
///     .text("Save")
///     .append_to(body);
/// assert_eq!(doc.get_element_by_id("save"), Some(button));
/// ```
pub struct ElementBuilder<'a> {
    doc: &'a mut Document,
    node: NodeId,
}

impl ElementBuilder<'_> {
    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.doc.set_attr(self.node, name, value);
        self
    }

    /// Add a class.
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.doc.add_class(self.node, class);
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn text(self, text: &str) -> Self {
        self.doc.nodes[self.node.0].text = text.to_owned();
        self
    }

    /// Set the form value.
    #[must_use]
    pub fn value(self, value: &str) -> Self {
        self.doc.set_value(self.node, value);
        self
    }

    /// Append to `parent` and return the new node.
    pub fn append_to(self, parent: NodeId) -> NodeId {
        // A freshly created node has no descendants, so this cannot cycle.
        let _ = self.doc.append_child(parent, self.node);
        self.node
    }

    /// Finish without attaching.
    #[must_use]
    pub fn build(self) -> NodeId {
        self.node
    }
}
