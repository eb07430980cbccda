//! Selector queries
//!
//! A small selector engine covering what the widgets and their hosts need:
//! compound selectors built from a tag (or `*`), `#id`, `.class`,
//! `[attr]`, `[attr=value]` and `:not(..)`, joined by descendant
//! combinators (whitespace).
//!
//! ```text
//! .datepicker__calendar_days button:not([disabled])
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::node::{Node, NodeId};
use crate::traversal::NodeIterator;
use crate::Document;

/// Selector parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Nothing to match.
    Empty,
    /// Unexpected character at a byte offset.
    Unexpected { position: usize, found: char },
    /// Input ended inside a construct.
    UnexpectedEnd,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Empty => write!(f, "empty selector"),
            SelectorError::Unexpected { position, found } => {
                write!(f, "unexpected '{}' at position {}", found, position)
            }
            SelectorError::UnexpectedEnd => write!(f, "selector ended unexpectedly"),
        }
    }
}

/// Attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub value: Option<String>,
}

/// Conditions that must all hold on one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
    pub not: Vec<Compound>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.not.is_empty()
    }

    /// Check the conditions against one node.
    pub fn matches(&self, node: &Node) -> bool {
        let element = match node.element() {
            Some(e) => e,
            None => return false,
        };
        if let Some(tag) = &self.tag {
            if !element.matches_tag(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        let attrs_ok = self.attrs.iter().all(|a| match &a.value {
            Some(value) => element.get_attribute(&a.name) == Some(value.as_str()),
            None => element.has_attribute(&a.name),
        });
        attrs_ok && !self.not.iter().any(|n| n.matches(node))
    }
}

/// A parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser { input, pos: 0 };
        let mut compounds = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.peek().is_none() {
                break;
            }
            compounds.push(parser.compound()?);
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Selector { compounds })
    }

    /// Whether `node_id` matches, looking at its ancestors for the
    /// descendant parts.
    pub fn matches(&self, doc: &Document, node_id: NodeId) -> bool {
        let (last, rest) = match self.compounds.split_last() {
            Some(split) => split,
            None => return false,
        };
        match doc.get(node_id) {
            Some(node) if last.matches(node) => {}
            _ => return false,
        }

        let mut ancestors = doc.ancestors(node_id).into_iter();
        'outer: for compound in rest.iter().rev() {
            for id in ancestors.by_ref() {
                if doc.get(id).map(|n| compound.matches(n)).unwrap_or(false) {
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(SelectorError::Unexpected {
                position: self.pos - found.len_utf8(),
                found,
            }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map(char::is_whitespace).unwrap_or(false) {
            self.bump();
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == start {
            return match self.peek() {
                Some(found) => Err(SelectorError::Unexpected {
                    position: self.pos,
                    found,
                }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(self.input[start..self.pos].into())
    }

    fn attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some(_) => {}
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                Ok(self.input[start..self.pos - 1].into())
            }
            _ => self.ident(),
        }
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.bump();
            }
            Some(c) if c.is_alphabetic() => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    self.skip_whitespace();
                    let name = self.ident()?;
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_whitespace();
                        Some(self.attr_value()?)
                    } else {
                        None
                    };
                    self.skip_whitespace();
                    self.expect(']')?;
                    compound.attrs.push(AttrMatch { name, value });
                }
                Some(':') => {
                    let position = self.pos;
                    self.bump();
                    let pseudo = self.ident()?;
                    if pseudo != "not" {
                        return Err(SelectorError::Unexpected {
                            position,
                            found: ':',
                        });
                    }
                    self.expect('(')?;
                    self.skip_whitespace();
                    let inner = self.compound()?;
                    self.skip_whitespace();
                    self.expect(')')?;
                    compound.not.push(inner);
                }
                _ => break,
            }
        }

        if compound.is_empty() && self.input[..self.pos].ends_with('*') {
            return Ok(compound);
        }
        if compound.is_empty() {
            return match self.peek() {
                Some(found) => Err(SelectorError::Unexpected {
                    position: self.pos,
                    found,
                }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(compound)
    }
}

/// Selector queries on Document.
impl Document {
    /// First element under `scope` (excluding `scope`) matching `selector`.
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        NodeIterator::elements(self, scope)
            .map(|n| n.id)
            .filter(|&id| id != scope)
            .find(|&id| selector.matches(self, id))
    }

    /// Every element under `scope` (excluding `scope`) matching `selector`.
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        NodeIterator::elements(self, scope)
            .map(|n| n.id)
            .filter(|&id| id != scope && selector.matches(self, id))
            .collect()
    }

    /// Parse and run a selector. Invalid selectors match nothing.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        match Selector::parse(selector) {
            Ok(sel) => self.select(scope, &sel),
            Err(err) => {
                log::debug!("[KPIO DOM] invalid selector {:?}: {}", selector, err);
                None
            }
        }
    }

    /// Parse and run a selector. Invalid selectors match nothing.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match Selector::parse(selector) {
            Ok(sel) => self.select_all(scope, &sel),
            Err(err) => {
                log::debug!("[KPIO DOM] invalid selector {:?}: {}", selector, err);
                Vec::new()
            }
        }
    }
}
