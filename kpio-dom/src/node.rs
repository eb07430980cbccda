//! DOM Node - Base node type

use alloc::string::String;
use core::fmt;

use crate::element::ElementData;

/// Node ID - index into the document arena.
///
/// IDs of released nodes are reused, so an ID is only meaningful while the
/// node it was handed out for is alive.
pub type NodeId = usize;

/// DOM node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
}

/// A DOM node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique ID of this node.
    pub id: NodeId,
    /// Node data (element, text, etc.)
    pub data: NodeData,
    /// Parent node ID.
    pub parent: Option<NodeId>,
    /// First child node ID.
    pub first_child: Option<NodeId>,
    /// Last child node ID.
    pub last_child: Option<NodeId>,
    /// Previous sibling node ID.
    pub prev_sibling: Option<NodeId>,
    /// Next sibling node ID.
    pub next_sibling: Option<NodeId>,
}

/// Node data union.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document node
    Document,
    /// Element node
    Element(ElementData),
    /// Text node
    Text { content: String },
    /// Comment node
    Comment { content: String },
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: &str, value: &str) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Node {
    fn with_data(id: NodeId, data: NodeData) -> Self {
        Node {
            id,
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Create a new document node.
    pub fn new_document(id: NodeId) -> Self {
        Self::with_data(id, NodeData::Document)
    }

    /// Create a new element node.
    pub fn new_element(id: NodeId, data: ElementData) -> Self {
        Self::with_data(id, NodeData::Element(data))
    }

    /// Create a new text node.
    pub fn new_text(id: NodeId, content: String) -> Self {
        Self::with_data(id, NodeData::Text { content })
    }

    /// Create a new comment node.
    pub fn new_comment(id: NodeId, content: String) -> Self {
        Self::with_data(id, NodeData::Comment { content })
    }

    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::Comment { .. } => NodeType::Comment,
        }
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    /// Check if this is a document node.
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    /// Element data (if element).
    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get tag name (lowercase local name of element).
    pub fn tag_name(&self) -> Option<&str> {
        self.element().map(|e| e.local_name())
    }

    /// Get element ID (if element with id attribute).
    pub fn element_id(&self) -> Option<&str> {
        self.element().and_then(|e| e.id.as_deref())
    }

    /// Get text content (if text node).
    pub fn text_content(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Get attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.element().and_then(|e| e.get_attribute(name))
    }

    /// Check if element has an attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.element().map(|e| e.has_attribute(name)).unwrap_or(false)
    }

    /// Check if element has a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.element().map(|e| e.has_class(class)).unwrap_or(false)
    }

    /// Check if this is a void element (no closing tag).
    pub fn is_void_element(&self) -> bool {
        if let Some(name) = self.tag_name() {
            matches!(
                name,
                "area"
                    | "base"
                    | "br"
                    | "col"
                    | "embed"
                    | "hr"
                    | "img"
                    | "input"
                    | "link"
                    | "meta"
                    | "source"
                    | "track"
                    | "wbr"
            )
        } else {
            false
        }
    }

    /// Whether this element can take keyboard focus.
    ///
    /// Form controls, links with `href` and anything carrying `tabindex` are
    /// focusable unless they are `disabled`.
    pub fn is_focusable(&self) -> bool {
        let element = match self.element() {
            Some(e) => e,
            None => return false,
        };
        if element.has_attribute("disabled") {
            return false;
        }
        match element.local_name() {
            "button" | "input" | "select" | "textarea" => true,
            "a" => element.has_attribute("href"),
            _ => element.has_attribute("tabindex"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            NodeData::Document => write!(f, "#document"),
            NodeData::Element(data) => write!(f, "<{}>", data.local_name()),
            NodeData::Text { content } => {
                if content.chars().count() > 20 {
                    let head: String = content.chars().take(20).collect();
                    write!(f, "\"{}...\"", head)
                } else {
                    write!(f, "\"{}\"", content)
                }
            }
            NodeData::Comment { content } => write!(f, "<!-- {} -->", content),
        }
    }
}
