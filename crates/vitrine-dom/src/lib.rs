//! Vitrine DOM - Document Object Model
//!
//! Arena-based document tree for the site behavior layer. The tree is the
//! single source of truth for page state: classes, attributes, inline
//! styles and form-control values all live on the nodes.

mod classlist;
mod document;
mod error;
mod events;
mod geometry;
mod node;
mod observer;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use error::DomError;
pub use events::{Event, EventDispatcher, EventType};
pub use geometry::DOMRect;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use observer::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverOptions};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Position in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
