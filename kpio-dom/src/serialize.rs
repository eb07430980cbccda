//! Markup serialization
//!
//! Renders a subtree back to HTML text. Output is deterministic for a given
//! tree (attributes in insertion order), which makes it usable for comparing
//! two renders structurally.

use alloc::string::String;

use crate::node::{NodeData, NodeId};
use crate::Document;

/// Escape text content.
pub fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Escape an attribute value (double-quoted).
pub fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Elements whose text children are emitted verbatim.
fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "style" | "script")
}

impl Document {
    /// Serialize a node and its subtree.
    pub fn outer_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node_id, false, &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag_name(node_id).map(is_raw_text).unwrap_or(false);
        for child in self.children(node_id) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    fn write_node(&self, node_id: NodeId, raw_text: bool, out: &mut String) {
        let node = match self.get(node_id) {
            Some(n) => n,
            None => return,
        };

        match &node.data {
            NodeData::Document => {
                for child in self.children(node_id) {
                    self.write_node(child, false, out);
                }
            }
            NodeData::Text { content } => {
                if raw_text {
                    out.push_str(content);
                } else {
                    escape_text(content, out);
                }
            }
            NodeData::Comment { content } => {
                out.push_str("<!--");
                out.push_str(content);
                out.push_str("-->");
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(element.local_name());
                for attr in &element.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attr(&attr.value, out);
                    out.push('"');
                }
                out.push('>');

                if node.is_void_element() {
                    return;
                }

                let raw = is_raw_text(element.local_name());
                for child in self.children(node_id) {
                    self.write_node(child, raw, out);
                }

                out.push_str("</");
                out.push_str(element.local_name());
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.add_class(div, "day");
        doc.add_class(div, "active");
        let button = doc.create_element("button");
        doc.set_attribute(button, "type", "button");
        doc.append_text(button, "15");
        doc.append_child(div, button);

        assert_eq!(
            doc.outer_html(div),
            "<div class=\"day active\"><button type=\"button\">15</button></div>"
        );
        assert_eq!(doc.inner_html(div), "<button type=\"button\">15</button>");
    }

    #[test]
    fn test_escaping_and_void_elements() {
        let mut doc = Document::new();
        let label = doc.create_element("label");
        doc.append_text(label, "a < b & c");
        let input = doc.create_element("input");
        doc.set_attribute(input, "placeholder", "say \"hi\"");
        doc.append_child(label, input);

        assert_eq!(
            doc.outer_html(label),
            "<label>a &lt; b &amp; c<input placeholder=\"say &quot;hi&quot;\"></label>"
        );
    }

    #[test]
    fn test_style_is_raw() {
        let mut doc = Document::new();
        let style = doc.create_element("style");
        doc.append_text(style, "a > b { color: red }");
        assert_eq!(doc.outer_html(style), "<style>a > b { color: red }</style>");
        assert_eq!(doc.inner_html(style), "a > b { color: red }");
    }
}
