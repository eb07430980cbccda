//! KPIO DOM - Document Object Model for KPIO widgets
//!
//! This crate provides an arena-backed DOM that hosts the KPIO date picker
//! widgets: tree mutation with slot reuse, selector queries, markup
//! serialization, markup fragments, focus tracking and event propagation.
//! It implements the subset of the DOM standard the date picker widgets need, in no_std.

#![no_std]

extern crate alloc;

pub mod document;
pub mod element;
pub mod events;
pub mod fragment;
pub mod node;
pub mod selector;
pub mod serialize;
pub mod text;
pub mod traversal;

pub use document::{Document, DOCUMENT_NODE};
pub use element::ElementData;
pub use events::{
    DispatchPlan, Event, EventData, EventDispatcher, EventHandler, EventPhase, EventType,
    InputEventData, KeyboardEventData, ListenerId, ListenerOptions,
};
pub use fragment::FragmentError;
pub use node::{Attribute, Node, NodeData, NodeId, NodeType};
pub use selector::{Selector, SelectorError};
pub use text::Text;
pub use traversal::NodeIterator;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Document, ElementData, Node, NodeId, NodeType, Text};
    pub use crate::{Event, EventDispatcher, EventType, ListenerOptions};
    pub use crate::{NodeIterator, Selector};
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build, query, serialize and rebuild a small calendar-like tree.
    #[test]
    fn test_region_rebuild_round_trip() {
        let mut doc = Document::new();
        let root = doc.root();
        let host = doc.create_element("div");
        doc.set_attribute(host, "id", "app");
        doc.append_child(root, host);

        let build = |doc: &mut Document| {
            doc.clear_children(host);
            for day in 1..=3 {
                let cell = doc.create_element("div");
                doc.add_class(cell, "day");
                let button = doc.create_element("button");
                doc.append_text(button, &alloc::format!("{}", day));
                doc.append_child(cell, button);
                doc.append_child(host, cell);
            }
            doc.inner_html(host)
        };

        let first = build(&mut doc);
        let second = build(&mut doc);
        assert_eq!(first, second);
        assert_eq!(doc.query_selector_all(root, "#app .day button").len(), 3);
        assert_eq!(doc.get_element_by_id("app"), Some(host));
    }

    /// Listeners on a region keep working across rebuilds of its children.
    #[test]
    fn test_delegated_listener_survives_rebuild() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        let mut doc = Document::new();
        let mut dispatcher = EventDispatcher::new();
        let region = doc.create_element("div");
        doc.append_child(doc.root(), region);

        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        dispatcher.add_event_listener(
            region,
            EventType::Click,
            Rc::new(move |_e: &mut Event| seen.set(seen.get() + 1)),
            ListenerOptions::default(),
        );

        for _ in 0..2 {
            doc.clear_children(region);
            let button = doc.create_element("button");
            doc.append_child(region, button);
            let path = doc.event_path(button);
            dispatcher.dispatch(&mut Event::new(EventType::Click, button), &path);
        }
        assert_eq!(hits.get(), 2);
    }
}
