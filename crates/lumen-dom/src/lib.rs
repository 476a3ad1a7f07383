//! Lumen DOM - Document Object Model
//!
//! Arena-based DOM tree that the accessibility layer mutates: elements,
//! text, attributes, class lists, inline styles, selector queries, focus,
//! event listeners and mutation observation.

mod attributes;
mod classlist;
mod document;
mod events;
mod geometry;
mod node;
mod observer;
mod selector;
mod style;
mod tree;
mod window;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::{Document, ScrollBehavior, ScrollRequest};
pub use events::{EventKind, KeyboardEvent, ListenerId, UiEvent};
pub use geometry::{DOMRect, ElementGeometry};
pub use node::{ElementData, Node, NodeData};
pub use observer::{MutationObserverInit, MutationRecord, MutationType, ObserverId};
pub use selector::{SelectorError, SelectorList};
pub use style::CssStyleDeclaration;
pub use tree::DomTree;
pub use window::{Navigator, Window};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the `NONE` sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    #[error("hierarchy request error: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {0:?} cannot have children")]
    InvalidNodeType(NodeId),
}
