//! Page host
//!
//! One document, one event dispatcher and the colour-scheme signal, shared by
//! every widget mounted on the page. Everything runs on the calling thread:
//! the drivers below play the part of the browser's event loop.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use kpio_dom::{
    Document, Event, EventDispatcher, EventHandler, EventType, InputEventData,
    KeyboardEventData, ListenerId, ListenerOptions, NodeId,
};

/// Listener for colour-scheme changes; receives `prefers_dark`.
pub type ColorSchemeListener = Rc<dyn Fn(bool)>;

struct PageInner {
    document: RefCell<Document>,
    dispatcher: RefCell<EventDispatcher>,
    body: NodeId,
    prefers_dark: Cell<bool>,
    scheme_listeners: RefCell<Vec<ColorSchemeListener>>,
}

/// Shared handle to the hosting page.
#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

impl Page {
    /// Empty page with a `<body>` element.
    pub fn new() -> Self {
        let mut document = Document::new();
        let body = document.create_element("body");
        let root = document.root();
        document.append_child(root, body);

        Page {
            inner: Rc::new(PageInner {
                document: RefCell::new(document),
                dispatcher: RefCell::new(EventDispatcher::new()),
                body,
                prefers_dark: Cell::new(false),
                scheme_listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn body(&self) -> NodeId {
        self.inner.body
    }

    /// Borrow the document.
    ///
    /// Do not hold the guard across a dispatch: handlers borrow it too.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut doc = self.document_mut();
        let node = doc.create_element(tag);
        doc.append_child(parent, node);
        node
    }

    /// Release every child of `node`, dropping listeners on released nodes.
    pub fn clear_children(&self, node: NodeId) -> Vec<NodeId> {
        let released = self.document_mut().clear_children(node);
        self.forget(&released);
        released
    }

    /// Detach and release `node` with its subtree.
    pub fn release(&self, node: NodeId) -> Vec<NodeId> {
        let released = self.document_mut().release(node);
        self.forget(&released);
        released
    }

    fn forget(&self, released: &[NodeId]) {
        let mut dispatcher = self.inner.dispatcher.borrow_mut();
        for &id in released {
            dispatcher.remove_node(id);
        }
    }

    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: EventType,
        handler: EventHandler,
        options: ListenerOptions,
    ) -> ListenerId {
        self.inner
            .dispatcher
            .borrow_mut()
            .add_event_listener(node, event_type, handler, options)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.dispatcher.borrow_mut().remove_event_listener(id)
    }

    /// Dispatch along the target's current ancestor path.
    ///
    /// Returns `false` if a handler prevented the default action.
    pub fn dispatch(&self, event: &mut Event) -> bool {
        let path = self.document().event_path(event.target);
        if path.is_empty() {
            log::trace!("[KPIO Page] dropping {} for released node {}", event.event_type.as_str(), event.target);
            return true;
        }
        let plan = self.inner.dispatcher.borrow_mut().plan(event, &path);
        plan.run(event)
    }

    /// Move focus to `node`, firing blur/focusout and focus/focusin.
    pub fn focus(&self, node: NodeId) -> bool {
        let previous = self.focused();
        if previous == Some(node) {
            return true;
        }
        if !self.document_mut().focus(node) {
            return false;
        }
        if let Some(previous) = previous {
            self.dispatch(&mut Event::new(EventType::Blur, previous));
            self.dispatch(&mut Event::new(EventType::FocusOut, previous));
        }
        self.dispatch(&mut Event::new(EventType::Focus, node));
        self.dispatch(&mut Event::new(EventType::FocusIn, node));
        true
    }

    pub fn blur(&self) {
        let previous = self.focused();
        self.document_mut().blur();
        if let Some(previous) = previous {
            self.dispatch(&mut Event::new(EventType::Blur, previous));
            self.dispatch(&mut Event::new(EventType::FocusOut, previous));
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.document().focused()
    }

    /// Simulate a pointer click: mousedown, focus, click.
    ///
    /// Disabled controls swallow the click. Returns `false` when nothing was
    /// dispatched or a handler prevented the default action.
    pub fn click(&self, node: NodeId) -> bool {
        let (exists, disabled, focusable) = {
            let doc = self.document();
            match doc.get(node) {
                Some(n) => (true, n.has_attribute("disabled"), n.is_focusable()),
                None => (false, false, false),
            }
        };
        if !exists || disabled {
            return false;
        }
        self.dispatch(&mut Event::new(EventType::MouseDown, node));
        if focusable {
            self.focus(node);
        }
        self.dispatch(&mut Event::new(EventType::Click, node))
    }

    pub fn key_down(&self, node: NodeId, key: &str) -> bool {
        let mut event = Event::keyboard(EventType::KeyDown, node, KeyboardEventData::for_key(key));
        self.dispatch(&mut event)
    }

    pub fn key_up(&self, node: NodeId, key: &str) -> bool {
        let mut event = Event::keyboard(EventType::KeyUp, node, KeyboardEventData::for_key(key));
        self.dispatch(&mut event)
    }

    /// Replace the value of a text field as if typed: sets the value, fires
    /// `input`, then `keyup` for the last character.
    pub fn type_text(&self, input: NodeId, text: &str) {
        self.document_mut().set_value(input, text);
        let data = InputEventData {
            data: Some(text.into()),
            input_type: "insertText".into(),
            is_composing: false,
        };
        self.dispatch(&mut Event::input(input, data));

        let last = text
            .chars()
            .last()
            .map(String::from)
            .unwrap_or_else(|| String::from("Backspace"));
        self.key_up(input, &last);
    }

    pub fn prefers_dark(&self) -> bool {
        self.inner.prefers_dark.get()
    }

    /// Change the system colour-scheme preference and notify listeners.
    pub fn set_prefers_dark(&self, dark: bool) {
        if self.inner.prefers_dark.replace(dark) == dark {
            return;
        }
        log::debug!("[KPIO Page] colour scheme changed, prefers dark: {}", dark);
        let listeners: Vec<ColorSchemeListener> = self.inner.scheme_listeners.borrow().clone();
        for listener in listeners {
            listener(dark);
        }
    }

    pub fn on_color_scheme_change(&self, listener: ColorSchemeListener) {
        self.inner.scheme_listeners.borrow_mut().push(listener);
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_focuses_and_bubbles() {
        let page = Page::new();
        let body = page.body();
        let button = page.append_element(body, "button");

        let clicks = Rc::new(Cell::new(0));
        let seen = clicks.clone();
        page.add_event_listener(
            body,
            EventType::Click,
            Rc::new(move |e: &mut Event| {
                assert!(e.path_contains(button));
                seen.set(seen.get() + 1);
            }),
            ListenerOptions::default(),
        );

        assert!(page.click(button));
        assert_eq!(clicks.get(), 1);
        assert_eq!(page.focused(), Some(button));

        page.document_mut().set_attribute(button, "disabled", "true");
        assert!(!page.click(button));
        assert_eq!(clicks.get(), 1);
        assert_eq!(page.focused(), None);
    }

    #[test]
    fn test_focus_events() {
        let page = Page::new();
        let body = page.body();
        let a = page.append_element(body, "input");
        let b = page.append_element(body, "input");

        let log = Rc::new(RefCell::new(Vec::new()));
        for node in [a, b] {
            for ty in [EventType::Focus, EventType::Blur] {
                let sink = log.clone();
                page.add_event_listener(
                    node,
                    ty,
                    Rc::new(move |e: &mut Event| sink.borrow_mut().push((e.target, e.event_type))),
                    ListenerOptions::default(),
                );
            }
        }

        assert!(page.focus(a));
        assert!(page.focus(b));
        assert!(page.focus(b));
        assert_eq!(
            *log.borrow(),
            vec![(a, EventType::Focus), (a, EventType::Blur), (b, EventType::Focus)]
        );
    }

    #[test]
    fn test_type_text_fires_input_and_keyup() {
        let page = Page::new();
        let input = page.append_element(page.body(), "input");
        let keys = Rc::new(RefCell::new(Vec::new()));
        let sink = keys.clone();
        page.add_event_listener(
            input,
            EventType::KeyUp,
            Rc::new(move |e: &mut Event| sink.borrow_mut().push(e.key().map(String::from))),
            ListenerOptions::default(),
        );

        page.type_text(input, "2024-01-15");
        assert_eq!(page.document().value(input), Some("2024-01-15"));
        assert_eq!(*keys.borrow(), vec![Some(String::from("5"))]);
    }

    #[test]
    fn test_color_scheme_signal_is_edge_triggered() {
        let page = Page::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        page.on_color_scheme_change(Rc::new(move |dark| sink.borrow_mut().push(dark)));

        page.set_prefers_dark(true);
        page.set_prefers_dark(true);
        page.set_prefers_dark(false);
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!page.prefers_dark());
    }
}
