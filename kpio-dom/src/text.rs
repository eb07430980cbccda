//! DOM Text - Text node implementation

use alloc::string::String;

use crate::node::{Node, NodeData, NodeId};
use crate::Document;

/// Text node methods.
pub trait Text {
    /// Get the text content.
    fn text_data(&self) -> Option<&str>;

    /// Check if the text is whitespace only.
    fn is_whitespace_only(&self) -> bool;
}

impl Text for Node {
    fn text_data(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { content } => Some(content),
            _ => None,
        }
    }

    fn is_whitespace_only(&self) -> bool {
        self.text_data()
            .map(|t| t.chars().all(|c| c.is_whitespace()))
            .unwrap_or(true)
    }
}

/// Text manipulation methods for Document.
impl Document {
    /// Replace all children of a node with a single text node.
    ///
    /// Returns the released child IDs. An empty string leaves the node empty.
    pub fn set_text_content(&mut self, node_id: NodeId, text: &str) -> alloc::vec::Vec<NodeId> {
        let released = self.clear_children(node_id);
        if !text.is_empty() {
            let text_id = self.create_text(text);
            self.append_child(node_id, text_id);
        }
        released
    }

    /// Get text content of a node (recursive).
    pub fn text_content(&self, node_id: NodeId) -> String {
        let node = match self.get(node_id) {
            Some(n) => n,
            None => return String::new(),
        };

        match &node.data {
            NodeData::Text { content } => content.clone(),
            NodeData::Element(_) | NodeData::Document => {
                let mut result = String::new();
                for child_id in self.children(node_id) {
                    result.push_str(&self.text_content(child_id));
                }
                result
            }
            NodeData::Comment { .. } => String::new(),
        }
    }

    /// Append text to a node, merging into a trailing text child.
    pub fn append_text(&mut self, parent_id: NodeId, text: &str) {
        let last_id = self.get(parent_id).and_then(|p| p.last_child);
        if let Some(last) = last_id.and_then(|id| self.get_mut(id)) {
            if let NodeData::Text { content } = &mut last.data {
                content.push_str(text);
                return;
            }
        }

        let text_id = self.create_text(text);
        self.append_child(parent_id, text_id);
    }
}
