//! DOM Traversal - Tree walking and iteration

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Node, NodeId, NodeType};
use crate::Document;

/// What to show constants (bitmask).
pub mod show {
    pub const ALL: u32 = 0xFFFFFFFF;
    pub const ELEMENT: u32 = 0x1;
    pub const TEXT: u32 = 0x4;
    pub const COMMENT: u32 = 0x80;
    pub const DOCUMENT: u32 = 0x100;
}

fn show_bit(node: &Node) -> u32 {
    match node.node_type() {
        NodeType::Element => show::ELEMENT,
        NodeType::Text => show::TEXT,
        NodeType::Comment => show::COMMENT,
        NodeType::Document => show::DOCUMENT,
    }
}

/// Pre-order iterator over a subtree, root included.
pub struct NodeIterator<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
    what_to_show: u32,
}

impl<'a> NodeIterator<'a> {
    /// Create a new node iterator.
    pub fn new(document: &'a Document, root: NodeId) -> Self {
        NodeIterator {
            document,
            stack: vec![root],
            what_to_show: show::ALL,
        }
    }

    /// Set what to show filter.
    pub fn with_what_to_show(mut self, what_to_show: u32) -> Self {
        self.what_to_show = what_to_show;
        self
    }

    /// Create an iterator for elements only.
    pub fn elements(document: &'a Document, root: NodeId) -> Self {
        Self::new(document, root).with_what_to_show(show::ELEMENT)
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node_id) = self.stack.pop() {
            let node = match self.document.get(node_id) {
                Some(n) => n,
                None => continue,
            };

            // Add children in reverse order (so first child is processed first)
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.document.get(id).and_then(|n| n.prev_sibling);
            }

            if self.what_to_show & show_bit(node) != 0 {
                return Some(node);
            }
        }

        None
    }
}

/// Extension methods for Document.
impl Document {
    /// Get all descendants of a node.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        NodeIterator::new(self, root)
            .filter(|n| n.id != root)
            .map(|n| n.id)
            .collect()
    }

    /// Get all element descendants of a node.
    pub fn element_descendants(&self, root: NodeId) -> Vec<NodeId> {
        NodeIterator::elements(self, root)
            .filter(|n| n.id != root)
            .map(|n| n.id)
            .collect()
    }

    /// Get ancestors of a node (from parent to root).
    pub fn ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.get(node_id).and_then(|n| n.parent);

        while let Some(id) = current {
            ancestors.push(id);
            current = self.get(id).and_then(|n| n.parent);
        }

        ancestors
    }

    /// Check if node is a descendant of another.
    pub fn is_descendant_of(&self, node_id: NodeId, ancestor_id: NodeId) -> bool {
        let mut current = self.get(node_id).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// `other` is `node_id` itself or inside it.
    pub fn contains(&self, node_id: NodeId, other: NodeId) -> bool {
        node_id == other || self.is_descendant_of(other, node_id)
    }

    /// Propagation path for an event: the target first, then its ancestors.
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        if self.get(target).is_none() {
            return Vec::new();
        }
        let mut path = vec![target];
        path.extend(self.ancestors(target));
        path
    }

    /// Get the depth of a node (distance from root).
    pub fn depth(&self, node_id: NodeId) -> usize {
        self.ancestors(node_id).len()
    }
}
