//! Markup fragments
//!
//! Parses small, trusted markup snippets (icons, labels) into detached
//! nodes. Handles elements, quoted/unquoted/boolean attributes, self-closing
//! tags, void elements, comments and the common character references. It is
//! not an HTML5 tree builder: mismatched tags are an error, not repaired.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::node::{Node, NodeId};
use crate::Document;

/// Fragment parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// A closing tag did not match the open element.
    MismatchedTag { expected: String, found: String },
    /// A closing tag with nothing open.
    UnexpectedClose(String),
    /// Input ended inside a tag or with elements still open.
    UnexpectedEnd,
    /// Malformed tag syntax at a byte offset.
    InvalidTag(usize),
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentError::MismatchedTag { expected, found } => {
                write!(f, "expected </{}>, found </{}>", expected, found)
            }
            FragmentError::UnexpectedClose(tag) => write!(f, "unexpected </{}>", tag),
            FragmentError::UnexpectedEnd => write!(f, "markup ended unexpectedly"),
            FragmentError::InvalidTag(pos) => write!(f, "invalid tag at position {}", pos),
        }
    }
}

fn is_void(tag: &str) -> bool {
    let node = Node::new_element(0, crate::ElementData::new(tag));
    node.is_void_element()
}

/// Decode character references in text or attribute values.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let end = match rest.find(';') {
            Some(end) if end <= 10 => end,
            _ => {
                out.push('&');
                rest = &rest[1..];
                continue;
            }
        };
        let name = &rest[1..end];
        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| name.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl Document {
    /// Parse `markup` into detached top-level nodes.
    ///
    /// On error every node created so far is released again.
    pub fn parse_fragment(&mut self, markup: &str) -> Result<Vec<NodeId>, FragmentError> {
        let mut top = Vec::new();
        let mut created = Vec::new();
        let result = self.parse_into(markup, &mut top, &mut created);
        match result {
            Ok(()) => Ok(top),
            Err(err) => {
                for id in created {
                    self.release(id);
                }
                Err(err)
            }
        }
    }

    /// Parse `markup` and append the result to `parent`.
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Result<(), FragmentError> {
        for node in self.parse_fragment(markup)? {
            self.append_child(parent, node);
        }
        Ok(())
    }

    fn parse_into(
        &mut self,
        markup: &str,
        top: &mut Vec<NodeId>,
        created: &mut Vec<NodeId>,
    ) -> Result<(), FragmentError> {
        // (node, tag) of open elements
        let mut open: Vec<(NodeId, String)> = Vec::new();
        let mut pos = 0;

        while pos < markup.len() {
            let rest = &markup[pos..];

            if let Some(comment) = rest.strip_prefix("<!--") {
                let end = comment.find("-->").ok_or(FragmentError::UnexpectedEnd)?;
                let node = self.create_comment(&comment[..end]);
                created.push(node);
                self.place(node, &open, top);
                pos += 4 + end + 3;
                continue;
            }

            if let Some(close) = rest.strip_prefix("</") {
                let end = close.find('>').ok_or(FragmentError::UnexpectedEnd)?;
                let tag = close[..end].trim().to_ascii_lowercase();
                match open.pop() {
                    Some((_, expected)) if expected == tag => {}
                    Some((_, expected)) => {
                        return Err(FragmentError::MismatchedTag {
                            expected,
                            found: tag,
                        })
                    }
                    None => return Err(FragmentError::UnexpectedClose(tag)),
                }
                pos += 2 + end + 1;
                continue;
            }

            if rest.starts_with('<') {
                let (consumed, node, tag, self_closing) = self.open_tag(markup, pos)?;
                created.push(node);
                self.place(node, &open, top);
                if !self_closing && !is_void(&tag) {
                    open.push((node, tag));
                }
                pos += consumed;
                continue;
            }

            let end = rest.find('<').unwrap_or(rest.len());
            let text = decode_entities(&rest[..end]);
            let node = self.create_text(&text);
            created.push(node);
            self.place(node, &open, top);
            pos += end;
        }

        if open.is_empty() {
            Ok(())
        } else {
            Err(FragmentError::UnexpectedEnd)
        }
    }

    fn place(&mut self, node: NodeId, open: &[(NodeId, String)], top: &mut Vec<NodeId>) {
        match open.last() {
            Some((parent, _)) => self.append_child(*parent, node),
            None => top.push(node),
        }
    }

    /// Parse `<tag attr=...>` at `start`. Returns (bytes consumed, node, tag, self-closing).
    fn open_tag(
        &mut self,
        markup: &str,
        start: usize,
    ) -> Result<(usize, NodeId, String, bool), FragmentError> {
        let bytes = markup.as_bytes();
        let mut i = start + 1;

        let name_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':') {
            i += 1;
        }
        if i == name_start {
            return Err(FragmentError::InvalidTag(start));
        }
        let tag = markup[name_start..i].to_ascii_lowercase();
        let node = self.create_element(&tag);

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                None => {
                    self.release(node);
                    return Err(FragmentError::UnexpectedEnd);
                }
                Some(b'>') => return Ok((i + 1 - start, node, tag, false)),
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                    return Ok((i + 2 - start, node, tag, true))
                }
                Some(_) => {}
            }

            let attr_start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            if i == attr_start {
                self.release(node);
                return Err(FragmentError::InvalidTag(i));
            }
            let name = markup[attr_start..i].to_ascii_lowercase();

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let value = if bytes.get(i) == Some(&b'=') {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                match bytes.get(i) {
                    Some(&quote) if quote == b'"' || quote == b'\'' => {
                        let value_start = i + 1;
                        let len = match markup[value_start..].find(quote as char) {
                            Some(len) => len,
                            None => {
                                self.release(node);
                                return Err(FragmentError::UnexpectedEnd);
                            }
                        };
                        i = value_start + len + 1;
                        decode_entities(&markup[value_start..value_start + len])
                    }
                    _ => {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                            i += 1;
                        }
                        decode_entities(&markup[value_start..i])
                    }
                }
            } else {
                String::new()
            };
            self.set_attribute(node, &name, &value);
        }
    }
}
