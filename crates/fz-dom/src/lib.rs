//! fz DOM - Document Object Model
//!
//! Arena-backed document tree used by the page controllers.
//! Elements carry their class list, attributes, inline style, live form
//! value and an optional layout box.

mod classlist;
mod document;
mod events;
mod geometry;
mod node;
mod selector;
mod style;
mod tree;

pub use classlist::ClassList;
pub use document::{Document, ReadyState};
pub use events::{Event, EventType};
pub use geometry::DOMRect;
pub use node::{ElementData, Node, NodeData};
pub use selector::{Selector, SelectorError};
pub use style::StyleDeclaration;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Build an ID from a raw arena index
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Check the ID is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// DOM errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}
