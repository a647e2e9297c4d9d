//! DOM errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node {0} no longer exists")]
    StaleNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),
}
