//! Arena-backed page used by native hosts and tests.

use std::collections::BTreeMap;

use super::{Document, TaggedElement};

/// Handle into a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    top: Option<f64>,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            text: String::new(),
            parent,
            children: Vec::new(),
            top: None,
        }
    }
}

/// In-memory page tree with `<html>`, `<head>`, `<title>` and `<body>`.
///
/// Mutations made through [`Document`] are counted by [`writes`](Self::writes);
/// seeding helpers are not.
///
/// Detached nodes keep their arena slot so stale handles stay readable; the
/// arena only grows. Use one document per preview or test rather than a
/// long-lived page.
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    writes: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty page skeleton.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::new("html", None)],
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            writes: 0,
        };
        doc.head = doc.insert(doc.root, "head");
        doc.insert(doc.head, "title");
        doc.body = doc.insert(doc.root, "body");
        doc
    }

    /// `<head>` element.
    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    /// `<body>` element.
    #[must_use]
    pub const fn body_node(&self) -> NodeId {
        self.body
    }

    /// Append a child element without counting a write.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.insert(parent, tag)
    }

    /// Append a child element with an id without counting a write.
    pub fn element_with_id(&mut self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = self.insert(parent, tag);
        self.seed_attribute(node, "id", id);
        node
    }

    /// Set an attribute without counting a write.
    pub fn seed_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Add a class without counting a write.
    pub fn seed_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.node_mut(node).classes;
        if !classes.iter().any(|existing| existing == class) {
            classes.push(class.to_string());
        }
    }

    /// Set text without counting a write.
    pub fn seed_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = text.to_string();
    }

    /// Position an element relative to the viewport top.
    pub fn set_viewport_top(&mut self, node: NodeId, top: f64) {
        self.node_mut(node).top = Some(top);
    }

    /// Inline style value.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).style.get(property).map(String::as_str)
    }

    /// Custom property set on `<html>`.
    #[must_use]
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.style(self.root, name)
    }

    /// Number of attached elements carrying `id`.
    #[must_use]
    pub fn count_with_id(&self, id: &str) -> usize {
        self.attached()
            .filter(|node| self.node(*node).attributes.get("id").map(String::as_str) == Some(id))
            .count()
    }

    /// Nodes ever allocated, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Mutations performed through [`Document`] so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Reset the mutation counter.
    pub fn reset_writes(&mut self) {
        self.writes = 0;
    }

    fn insert(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag, Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(from).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn attached(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(self.root).chain(self.descendants(self.root))
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached()
            .find(|node| self.node(*node).attributes.get("id").map(String::as_str) == Some(id))
    }

    fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        let tag = tag.to_ascii_uppercase();
        self.attached().find(|node| self.node(*node).tag == tag)
    }

    fn tagged(&self, attribute: &str) -> Vec<TaggedElement<NodeId>> {
        self.attached()
            .filter_map(|node| {
                let data = self.node(node);
                data.attributes.get(attribute).map(|key| TaggedElement {
                    node,
                    tag: data.tag.clone(),
                    key: key.clone(),
                })
            })
            .collect()
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.attached()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn descendants_by_tag(&self, parent: &NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_uppercase();
        self.descendants(*parent)
            .into_iter()
            .filter(|node| self.node(*node).tag == tag)
            .collect()
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.node(*node).tag.clone()
    }

    fn text(&self, node: &NodeId) -> String {
        self.node(*node).text.clone()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.writes += 1;
        let data = self.node_mut(*node);
        data.text = text.to_string();
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.node(*node).attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.writes += 1;
        self.seed_attribute(*node, name, value);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.node(*node).classes.iter().any(|existing| existing == class)
    }

    fn set_class(&mut self, node: &NodeId, class: &str, present: bool) {
        self.writes += 1;
        if present {
            self.seed_class(*node, class);
        } else {
            self.node_mut(*node).classes.retain(|existing| existing != class);
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.writes += 1;
        self.node_mut(*node)
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn create_element(&mut self, parent: &NodeId, tag: &str) -> Option<NodeId> {
        self.writes += 1;
        Some(self.insert(*parent, tag))
    }

    fn remove(&mut self, node: &NodeId) {
        self.writes += 1;
        if let Some(parent) = self.node_mut(*node).parent.take() {
            self.node_mut(parent).children.retain(|child| child != node);
        }
    }

    fn clear_children(&mut self, node: &NodeId) {
        self.writes += 1;
        let children = std::mem::take(&mut self.node_mut(*node).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        let mut current = *node;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn viewport_top(&self, node: &NodeId) -> Option<f64> {
        self.node(*node).top
    }
}
