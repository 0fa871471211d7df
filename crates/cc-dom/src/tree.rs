//! DOM Tree (arena-based allocation)
//!
//! Removing a node only detaches it. Detached subtrees can be handed back
//! with [`DomTree::free`]; their slots go on a free list and are reused
//! under a new generation, so stale `NodeId`s resolve to nothing.

use crate::{DomError, ElementData, Generation, Node, NodeId, SelectorList};

/// One arena slot
#[derive(Debug)]
struct Slot {
    generation: Generation,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            slots: vec![Slot { generation: Generation::INITIAL, node: Some(Node::document()) }],
            free: Vec::new(),
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Element data, or an error for unknown and non-element nodes
    pub fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.get(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let id = NodeId::new(self.slots.len() as u32, Generation::INITIAL);
        self.slots.push(Slot { generation: Generation::INITIAL, node: Some(node) });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Set one link field on a live node
    fn link(&mut self, id: NodeId, set: impl FnOnce(&mut Node)) {
        if let Some(node) = self.get_mut(id) {
            set(node);
        }
    }

    /// Append `child` as last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if parent_node.is_text() || child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }
        if self.get(child).is_none() {
            return Err(DomError::UnknownNode(child));
        }

        self.remove(child);

        let last = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);
        self.link(child, |node| {
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        });
        if last.is_valid() {
            self.link(last, |node| node.next_sibling = child);
        } else {
            self.link(parent, |node| node.first_child = child);
        }
        self.link(parent, |node| node.last_child = child);
        Ok(())
    }

    /// Detach a node from its parent. Returns false if it was not attached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return false;
        }

        if prev.is_valid() {
            self.link(prev, |node| node.next_sibling = next);
        } else {
            self.link(parent, |node| node.first_child = next);
        }
        if next.is_valid() {
            self.link(next, |node| node.prev_sibling = prev);
        } else {
            self.link(parent, |node| node.last_child = prev);
        }

        self.link(id, |node| {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        });
        true
    }

    /// Detach a node and release it together with its whole subtree.
    /// Returns the number of nodes freed; the document node is never freed.
    pub fn free(&mut self, id: NodeId) -> usize {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return 0;
        }
        self.remove(id);

        let mut doomed = self.descendants(id);
        doomed.push(id);
        for &node in &doomed {
            let slot = &mut self.slots[node.index()];
            slot.node = None;
            slot.generation = slot.generation.next();
            self.free.push(node.index() as u32);
        }
        doomed.len()
    }

    /// Free all children of a node
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            self.free(child);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// The node itself, then each ancestor up to the root
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).map(|_| id), move |&current| self.parent(current))
    }

    /// Descendants in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mark = stack.len();
            stack.extend(self.children(current));
            stack[mark..].reverse();
        }
        out
    }

    /// Whether `node` is `ancestor` or lies beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|id| id == ancestor)
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Closest inclusive ancestor element matching the selector
    pub fn closest(&self, id: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.ancestors_inclusive(id).find(|&a| self.matches(a, selector))
    }

    /// First descendant element matching the selector
    pub fn query_selector(&self, root: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|&d| self.matches(d, selector))
    }

    /// All descendant elements matching the selector, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&d| self.matches(d, selector))
            .collect()
    }

    pub fn matches(&self, id: NodeId, selector: &SelectorList) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|elem| selector.matches(elem))
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(current)
    }
}
