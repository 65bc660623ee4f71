//! DOM errors

use crate::NodeId;

/// Errors raised by tree operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node {0} does not exist")]
    InvalidNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot append {child} to {parent}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
