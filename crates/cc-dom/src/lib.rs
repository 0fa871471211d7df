//! Cifras DOM - Document Object Model
//!
//! Arena-backed DOM tree with just enough surface for the button runtime:
//! attributes and `data-*` access, inline style, class lists, simple
//! selectors, layout rects, focus and event values.

mod attributes;
mod classlist;
mod dataset;
mod document;
mod events;
mod generation;
mod geometry;
mod node;
mod selector;
mod style;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use dataset::data_attribute_name;
pub use document::Document;
pub use events::{EventPhase, EventType, KeyboardEvent, ListenerOptions, MouseEvent};
pub use generation::Generation;
pub use geometry::DOMRect;
pub use node::{ElementData, Node, NodeData};
pub use selector::{CompoundSelector, SelectorList, SimpleSelector};
pub use style::StyleDeclaration;
pub use tree::DomTree;

/// Node identifier: arena slot plus the slot generation it was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: Generation,
}

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId::new(0, Generation::INITIAL);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId::new(u32::MAX, Generation::INITIAL);

    pub(crate) const fn new(index: u32, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> Generation {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.generation.value() {
            0 => write!(f, "#{}", self.index),
            g => write!(f, "#{}v{}", self.index, g),
        }
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("No such node: {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} is not connected to the document")]
    Detached(NodeId),

    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),

    #[error("Cannot insert {child} into {parent}")]
    Hierarchy { parent: NodeId, child: NodeId },
}
