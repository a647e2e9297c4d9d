//! The document tree.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::error::DomError;
use crate::event::EventType;
use crate::node::{NodeData, NodeId, NodeKind};
use crate::ReadyState;

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// An HTML document: a tree of elements and text rooted at `<html>`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeId, NodeData>,
    next_id: u64,
    root: NodeId,
    ready_state: ReadyState,
    capture_listeners: BTreeSet<EventType>,
}

impl Document {
    /// `<html><head></head><body></body></html>`, still loading.
    pub fn new() -> Self {
        let mut doc = Self::bare();
        let root = doc.root;
        doc.append_new(root, NodeKind::element("head"));
        doc.append_new(root, NodeKind::element("body"));
        doc
    }

    /// A document with only the root `<html>` element, as seen before the
    /// parser has reached `<head>` or `<body>`.
    pub fn bare() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeData::new(NodeKind::element("html")));
        Self {
            nodes,
            next_id: 1,
            root,
            ready_state: ReadyState::Loading,
            capture_listeners: BTreeSet::new(),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The first `<head>` child of the root, if any.
    pub fn head(&self) -> Option<NodeId> {
        self.child_element_by_tag(self.root, "HEAD")
    }

    /// The first `<body>` child of the root, if any.
    pub fn body(&self) -> Option<NodeId> {
        self.child_element_by_tag(self.root, "BODY")
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    // ============================================================================
    // Tree construction
    // ============================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeKind::element(tag))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already in the tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.require_element(parent)?;
        self.require(child)?;

        if child == self.root {
            return Err(DomError::HierarchyRequest(
                "cannot move the document element".to_string(),
            ));
        }
        if self.ancestors_inclusive(parent).any(|n| n == child) {
            return Err(DomError::HierarchyRequest(format!(
                "{} is an ancestor of {}",
                child, parent
            )));
        }

        self.unlink(child);
        if let Some(data) = self.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(child);
        }
        Ok(())
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let node = self.create_element(tag);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Take a node (and its subtree) out of the tree without destroying it.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.require(node)?;
        if node == self.root {
            return Err(DomError::HierarchyRequest(
                "cannot detach the document element".to_string(),
            ));
        }
        self.unlink(node);
        Ok(())
    }

    /// Remove a node and its subtree. Handles to any of them stop resolving.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.detach(node)?;
        let doomed = self.descendants(node);
        for id in &doomed {
            self.nodes.remove(id);
        }
        trace!("Removed {} node(s) rooted at {}", doomed.len(), node);
        Ok(())
    }

    /// Replace all children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.require_element(node)?;
        let children = self.children(node).to_vec();
        for child in children {
            self.remove(child)?;
        }
        if !text.is_empty() {
            self.append_text(node, text)?;
        }
        Ok(())
    }

    // ============================================================================
    // Liveness and navigation
    // ============================================================================

    /// Whether the handle still refers to a node.
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Whether the node exists and is attached to this document's tree.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.exists(node) && self.ancestors_inclusive(node).last() == Some(self.root)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.kind(node).is_some_and(NodeKind::is_element)
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(&node).map(|data| &data.kind)
    }

    /// Uppercase tag name of an element.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.kind(node).and_then(NodeKind::tag_name)
    }

    /// Parent element. Only elements have children, so this is `parentNode`
    /// as well; the root has none.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|data| data.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    /// Siblings before `node`, nearest first (`previousSibling` order).
    pub fn preceding_siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self.parent(node).map(|p| self.children(p)).unwrap_or(&[]);
        let position = siblings.iter().position(|&n| n == node).unwrap_or(0);
        siblings[..position].iter().rev().copied()
    }

    /// `node` followed by its ancestors up to the root of its tree.
    pub fn ancestors_inclusive(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node).filter(|&n| self.exists(n)), move |&n| {
            self.parent(n)
        })
    }

    /// `node` and everything below it, in tree order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.exists(node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// First connected element whose id attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// Connected elements carrying `class`, in tree order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// Concatenated text of all descendant text nodes (`Node.textContent`).
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                Some(NodeKind::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // ============================================================================
    // Attributes and classes
    // ============================================================================

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&node).and_then(|data| data.attribute(name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let attributes = self.attributes_mut(node)?;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Returns whether the attribute was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<bool, DomError> {
        let attributes = self.attributes_mut(node)?;
        let before = attributes.len();
        attributes.retain(|(key, _)| key != name);
        Ok(attributes.len() != before)
    }

    /// The id attribute, or `""`.
    pub fn element_id(&self, node: NodeId) -> &str {
        self.attribute(node, "id").unwrap_or("")
    }

    /// The class attribute, or `""` (`Element.className`).
    pub fn class_name(&self, node: NodeId) -> &str {
        self.attribute(node, "class").unwrap_or("")
    }

    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.class_name(node).split_ascii_whitespace().collect()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_name(node)
            .split_ascii_whitespace()
            .any(|c| c == class)
    }

    /// `classList.add`. Returns whether the class was newly added.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<bool, DomError> {
        self.require_element(node)?;
        if self.has_class(node, class) {
            return Ok(false);
        }
        let mut classes: Vec<String> = self.class_list(node).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "))?;
        Ok(true)
    }

    /// `classList.remove`. Returns whether the class was present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<bool, DomError> {
        self.require_element(node)?;
        if !self.has_class(node, class) {
            return Ok(false);
        }
        let remaining: Vec<String> = self
            .class_list(node)
            .into_iter()
            .filter(|c| *c != class)
            .map(String::from)
            .collect();
        self.set_attribute(node, "class", &remaining.join(" "))?;
        Ok(true)
    }

    // ============================================================================
    // Document-level capture listeners
    // ============================================================================

    /// `document.addEventListener(kind, handler, true)`. Returns `false` if a
    /// listener for this kind was already registered.
    pub fn add_event_listener(&mut self, kind: EventType) -> bool {
        self.capture_listeners.insert(kind)
    }

    /// Returns `false` if no listener for this kind was registered.
    pub fn remove_event_listener(&mut self, kind: EventType) -> bool {
        self.capture_listeners.remove(&kind)
    }

    pub fn has_event_listener(&self, kind: EventType) -> bool {
        self.capture_listeners.contains(&kind)
    }

    pub fn event_listener_count(&self) -> usize {
        self.capture_listeners.len()
    }

    // ============================================================================
    // Internal
    // ============================================================================

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, NodeData::new(kind));
        id
    }

    fn append_new(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.insert(kind);
        if let Some(data) = self.nodes.get_mut(&id) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(id);
        }
        id
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|data| data.parent.take()) else {
            return;
        };
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.retain(|&c| c != node);
        }
    }

    fn child_element_by_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.tag_name(c) == Some(tag))
    }

    fn require(&self, node: NodeId) -> Result<(), DomError> {
        if self.exists(node) {
            Ok(())
        } else {
            Err(DomError::StaleNode(node))
        }
    }

    fn require_element(&self, node: NodeId) -> Result<(), DomError> {
        self.require(node)?;
        if self.is_element(node) {
            Ok(())
        } else {
            Err(DomError::NotAnElement(node))
        }
    }

    fn attributes_mut(&mut self, node: NodeId) -> Result<&mut Vec<(String, String)>, DomError> {
        match self.nodes.get_mut(&node).map(|data| &mut data.kind) {
            Some(NodeKind::Element { attributes, .. }) => Ok(attributes),
            Some(NodeKind::Text(_)) => Err(DomError::NotAnElement(node)),
            None => Err(DomError::StaleNode(node)),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
