//! Node storage types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a node in a [`Document`](crate::Document).
///
/// A handle is a back-reference only: holding one does not keep the node
/// alive, and every lookup through it is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        /// Uppercase, as `Element.tagName` reports for HTML documents.
        tag_name: String,
        /// Attributes in insertion order.
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

impl NodeKind {
    pub(crate) fn element(tag: &str) -> Self {
        NodeKind::Element {
            tag_name: tag.to_ascii_uppercase(),
            attributes: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            NodeKind::Element { tag_name, .. } => Some(tag_name),
            NodeKind::Text(_) => None,
        }
    }
}

/// A stored node with its tree links.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }
}
