//! DOM Document - Document node and tree management
//!
//! Nodes live in an arena indexed by [`NodeId`]. Releasing a subtree returns
//! its slots to a free list, so a region that is cleared and regenerated on
//! every change keeps the arena at a steady size.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::element::ElementData;
use crate::node::{Node, NodeId};

/// ID of the document node.
pub const DOCUMENT_NODE: NodeId = 0;

/// A DOM document.
#[derive(Debug)]
pub struct Document {
    /// Node arena; `None` marks a released slot.
    nodes: Vec<Option<Node>>,
    /// Released slots available for reuse.
    free: Vec<NodeId>,
    /// ID to node mapping.
    id_map: HashMap<String, NodeId>,
    /// Element holding keyboard focus.
    focused: Option<NodeId>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(Some(Node::new_document(DOCUMENT_NODE)));
        Document {
            nodes,
            free: Vec::new(),
            id_map: HashMap::new(),
            focused: None,
        }
    }

    /// Get the document node ID.
    pub fn root(&self) -> NodeId {
        DOCUMENT_NODE
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    /// Get element data of a node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| n.element())
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| n.element_mut())
    }

    fn alloc(&mut self, make: impl FnOnce(NodeId) -> Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(make(id));
                id
            }
            None => {
                let id = self.nodes.len();
                self.nodes.push(Some(make(id)));
                id
            }
        }
    }

    /// Create a new detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let data = ElementData::new(tag_name);
        self.alloc(|id| Node::new_element(id, data))
    }

    /// Create a new detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let content = String::from(content);
        self.alloc(|id| Node::new_text(id, content))
    }

    /// Create a new detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        let content = String::from(content);
        self.alloc(|id| Node::new_comment(id, content))
    }

    /// Append a child to a parent, detaching it from any previous parent.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        if self.get(parent_id).is_none() || self.get(child_id).is_none() {
            return;
        }
        if parent_id == child_id || self.is_descendant_of(parent_id, child_id) {
            log::warn!("[KPIO DOM] refusing to append node {} into its own subtree", child_id);
            return;
        }
        self.remove_child(child_id);

        // Set child's parent
        if let Some(child) = self.get_mut(child_id) {
            child.parent = Some(parent_id);
        }

        // Get parent's current last child
        let old_last_child = self.get(parent_id).and_then(|p| p.last_child);

        // Update old last child's next_sibling
        if let Some(old_last_id) = old_last_child {
            if let Some(old_last) = self.get_mut(old_last_id) {
                old_last.next_sibling = Some(child_id);
            }
        }

        // Update child's prev_sibling
        if let Some(child) = self.get_mut(child_id) {
            child.prev_sibling = old_last_child;
        }

        // Update parent
        if let Some(parent) = self.get_mut(parent_id) {
            if parent.first_child.is_none() {
                parent.first_child = Some(child_id);
            }
            parent.last_child = Some(child_id);
        }
    }

    /// Insert a child before another child (or append when `ref_child_id` is `None`).
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        new_child_id: NodeId,
        ref_child_id: Option<NodeId>,
    ) {
        let ref_id = match ref_child_id {
            Some(id) if self.get(id).and_then(|n| n.parent) == Some(parent_id) => id,
            _ => {
                self.append_child(parent_id, new_child_id);
                return;
            }
        };
        if new_child_id == ref_id || self.is_descendant_of(parent_id, new_child_id) {
            return;
        }
        self.remove_child(new_child_id);

        let prev_id = self.get(ref_id).and_then(|n| n.prev_sibling);

        // Update new child
        if let Some(new_child) = self.get_mut(new_child_id) {
            new_child.parent = Some(parent_id);
            new_child.prev_sibling = prev_id;
            new_child.next_sibling = Some(ref_id);
        }

        // Update ref child's prev_sibling
        if let Some(ref_child) = self.get_mut(ref_id) {
            ref_child.prev_sibling = Some(new_child_id);
        }

        // Update previous sibling's next_sibling
        if let Some(prev_id) = prev_id {
            if let Some(prev) = self.get_mut(prev_id) {
                prev.next_sibling = Some(new_child_id);
            }
        } else if let Some(parent) = self.get_mut(parent_id) {
            // new child is first child
            parent.first_child = Some(new_child_id);
        }
    }

    /// Detach a node from its parent. The node stays alive.
    pub fn remove_child(&mut self, child_id: NodeId) {
        let (parent_id, prev_id, next_id) = {
            let child = match self.get(child_id) {
                Some(c) => c,
                None => return,
            };
            (child.parent, child.prev_sibling, child.next_sibling)
        };

        // Update previous sibling
        if let Some(prev_id) = prev_id {
            if let Some(prev) = self.get_mut(prev_id) {
                prev.next_sibling = next_id;
            }
        } else if let Some(parent_id) = parent_id {
            // child was first child
            if let Some(parent) = self.get_mut(parent_id) {
                parent.first_child = next_id;
            }
        }

        // Update next sibling
        if let Some(next_id) = next_id {
            if let Some(next) = self.get_mut(next_id) {
                next.prev_sibling = prev_id;
            }
        } else if let Some(parent_id) = parent_id {
            // child was last child
            if let Some(parent) = self.get_mut(parent_id) {
                parent.last_child = prev_id;
            }
        }

        // Clear child's links
        if let Some(child) = self.get_mut(child_id) {
            child.parent = None;
            child.prev_sibling = None;
            child.next_sibling = None;
        }
    }

    /// Detach a node and free it together with its whole subtree.
    ///
    /// Returns every released ID so callers can drop state keyed by them.
    pub fn release(&mut self, node_id: NodeId) -> Vec<NodeId> {
        if node_id == DOCUMENT_NODE || self.get(node_id).is_none() {
            return Vec::new();
        }
        self.remove_child(node_id);

        let mut released = Vec::new();
        let mut stack = alloc::vec![node_id];
        while let Some(id) = stack.pop() {
            let node = match self.nodes.get_mut(id).and_then(Option::take) {
                Some(node) => node,
                None => continue,
            };
            let mut child = node.first_child;
            while let Some(child_id) = child {
                child = self.get(child_id).and_then(|c| c.next_sibling);
                stack.push(child_id);
            }
            if let Some(element_id) = node.element_id() {
                if self.id_map.get(element_id) == Some(&id) {
                    self.id_map.remove(element_id);
                }
            }
            if self.focused == Some(id) {
                self.focused = None;
            }
            self.free.push(id);
            released.push(id);
        }
        released
    }

    /// Release every child of `parent_id`. Returns the released IDs.
    pub fn clear_children(&mut self, parent_id: NodeId) -> Vec<NodeId> {
        let mut released = Vec::new();
        for child_id in self.children(parent_id) {
            released.extend(self.release(child_id));
        }
        released
    }

    /// Get parent of a node.
    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.get(node_id).and_then(|n| n.parent)
    }

    /// Get children of a node.
    pub fn children(&self, parent_id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut child_id = self.get(parent_id).and_then(|p| p.first_child);

        while let Some(id) = child_id {
            children.push(id);
            child_id = self.get(id).and_then(|n| n.next_sibling);
        }

        children
    }

    /// Get child element nodes.
    pub fn child_elements(&self, parent_id: NodeId) -> Vec<NodeId> {
        self.children(parent_id)
            .into_iter()
            .filter(|&id| self.get(id).map(|n| n.is_element()).unwrap_or(false))
            .collect()
    }

    /// Get tag name of an element.
    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.get(node_id).and_then(|n| n.tag_name())
    }

    /// Get attribute value.
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get(node_id).and_then(|n| n.get_attribute(name))
    }

    pub fn has_attribute(&self, node_id: NodeId, name: &str) -> bool {
        self.get(node_id).map(|n| n.has_attribute(name)).unwrap_or(false)
    }

    /// Set attribute value, keeping the id index current.
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) {
        let old_id = if name == "id" {
            self.element(node_id).and_then(|e| e.id.clone())
        } else {
            None
        };
        let element = match self.element_mut(node_id) {
            Some(e) => e,
            None => return,
        };
        element.set_attribute(name, value);

        if name == "id" {
            if let Some(old) = old_id {
                if self.id_map.get(&old) == Some(&node_id) {
                    self.id_map.remove(&old);
                }
            }
            self.id_map.insert(value.into(), node_id);
        } else if name == "disabled" {
            self.drop_focus_if_unfocusable(node_id);
        }
    }

    /// Remove attribute.
    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) {
        let old_id = if name == "id" {
            self.element(node_id).and_then(|e| e.id.clone())
        } else {
            None
        };
        if let Some(element) = self.element_mut(node_id) {
            element.remove_attribute(name);
        }
        if let Some(old) = old_id {
            if self.id_map.get(&old) == Some(&node_id) {
                self.id_map.remove(&old);
            }
        }
        if name == "disabled" || name == "tabindex" || name == "href" {
            self.drop_focus_if_unfocusable(node_id);
        }
    }

    pub fn has_class(&self, node_id: NodeId, class: &str) -> bool {
        self.get(node_id).map(|n| n.has_class(class)).unwrap_or(false)
    }

    pub fn add_class(&mut self, node_id: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.add_class(class);
        }
    }

    pub fn remove_class(&mut self, node_id: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.remove_class(class);
        }
    }

    /// Toggle a class; `force` pins the result. Returns whether the class is set.
    pub fn toggle_class(&mut self, node_id: NodeId, class: &str, force: Option<bool>) -> bool {
        self.element_mut(node_id)
            .map(|e| e.toggle_class(class, force))
            .unwrap_or(false)
    }

    /// Current value of a form control (its `value` attribute).
    pub fn value(&self, node_id: NodeId) -> Option<&str> {
        self.get_attribute(node_id, "value")
    }

    pub fn set_value(&mut self, node_id: NodeId, value: &str) {
        self.set_attribute(node_id, "value", value);
    }

    /// Get element by ID.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// Whether the node is attached to the document tree.
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == DOCUMENT_NODE || self.is_descendant_of(node_id, DOCUMENT_NODE)
    }

    /// Move keyboard focus to `node_id`.
    ///
    /// Detached, non-focusable and disabled elements are rejected and leave
    /// focus unchanged.
    pub fn focus(&mut self, node_id: NodeId) -> bool {
        let focusable = self.get(node_id).map(|n| n.is_focusable()).unwrap_or(false);
        if !focusable || !self.is_connected(node_id) {
            return false;
        }
        self.focused = Some(node_id);
        true
    }

    /// Drop keyboard focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Element holding keyboard focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&id| self.is_connected(id))
    }

    fn drop_focus_if_unfocusable(&mut self, node_id: NodeId) {
        if self.focused == Some(node_id) {
            let focusable = self.get(node_id).map(|n| n.is_focusable()).unwrap_or(false);
            if !focusable {
                self.focused = None;
            }
        }
    }

    /// Number of live nodes, including the document node.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if document is empty (only document node).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Arena slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter_map(Option::as_ref)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
