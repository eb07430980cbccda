//! DOM Event System
//!
//! Capture, target and bubble propagation over a node path, with per-node
//! listeners.
//!
//! Dispatch happens in two steps. [`EventDispatcher::plan`] snapshots every
//! listener along the path (and retires `once` listeners), then
//! [`DispatchPlan::run`] invokes them. Nothing is borrowed from the
//! dispatcher while handlers run, so a handler may rebuild the DOM, add
//! listeners or dispatch further events.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::node::NodeId;

/// Event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// Event is not being dispatched.
    None = 0,
    /// Event is propagating through target's ancestors (capture phase).
    Capturing = 1,
    /// Event has arrived at the event target.
    AtTarget = 2,
    /// Event is propagating back through target's ancestors (bubble phase).
    Bubbling = 3,
}

/// Event types understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseDown,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Input,
    Change,
}

impl EventType {
    /// Get event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::MouseDown => "mousedown",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::FocusIn => "focusin",
            EventType::FocusOut => "focusout",
            EventType::Input => "input",
            EventType::Change => "change",
        }
    }

    /// Parse event type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "click" => Some(EventType::Click),
            "mousedown" => Some(EventType::MouseDown),
            "keydown" => Some(EventType::KeyDown),
            "keyup" => Some(EventType::KeyUp),
            "focus" => Some(EventType::Focus),
            "blur" => Some(EventType::Blur),
            "focusin" => Some(EventType::FocusIn),
            "focusout" => Some(EventType::FocusOut),
            "input" => Some(EventType::Input),
            "change" => Some(EventType::Change),
            _ => None,
        }
    }

    /// Check if event bubbles by default.
    pub fn bubbles(&self) -> bool {
        !matches!(self, EventType::Focus | EventType::Blur)
    }

    /// Check if event is cancelable.
    pub fn cancelable(&self) -> bool {
        !matches!(
            self,
            EventType::Focus | EventType::Blur | EventType::FocusIn | EventType::FocusOut
        )
    }
}

/// Modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierKeys {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Base event data.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event type.
    pub event_type: EventType,
    /// Target element.
    pub target: NodeId,
    /// Current target (changes during propagation).
    pub current_target: Option<NodeId>,
    /// Event phase.
    pub phase: EventPhase,
    /// Whether event bubbles.
    pub bubbles: bool,
    /// Whether event is cancelable.
    pub cancelable: bool,
    /// Whether default action was prevented.
    pub default_prevented: bool,
    /// Whether propagation was stopped.
    pub propagation_stopped: bool,
    /// Whether immediate propagation was stopped.
    pub immediate_propagation_stopped: bool,
    /// Event-specific data.
    pub data: EventData,
    /// Propagation path captured when dispatch started, target first.
    pub path: Vec<NodeId>,
}

impl Event {
    /// Create a new event.
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: None,
            phase: EventPhase::None,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            data: EventData::None,
            path: Vec::new(),
        }
    }

    /// Create keyboard event.
    pub fn keyboard(event_type: EventType, target: NodeId, data: KeyboardEventData) -> Self {
        let mut event = Self::new(event_type, target);
        event.data = EventData::Keyboard(data);
        event
    }

    /// Create input event.
    pub fn input(target: NodeId, data: InputEventData) -> Self {
        let mut event = Self::new(EventType::Input, target);
        event.data = EventData::Input(data);
        event
    }

    /// Key of a keyboard event.
    pub fn key(&self) -> Option<&str> {
        match &self.data {
            EventData::Keyboard(k) => Some(k.key.as_str()),
            _ => None,
        }
    }

    /// Physical key code of a keyboard event.
    pub fn code(&self) -> Option<&str> {
        match &self.data {
            EventData::Keyboard(k) => Some(k.code.as_str()),
            _ => None,
        }
    }

    /// Whether `node` was on the propagation path.
    ///
    /// Still answers correctly after a handler released the target.
    pub fn path_contains(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }

    /// Prevent default action.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop immediate propagation.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

/// Event-specific data.
#[derive(Debug, Clone)]
pub enum EventData {
    /// No additional data.
    None,
    /// Keyboard event data.
    Keyboard(KeyboardEventData),
    /// Input event data.
    Input(InputEventData),
}

/// Keyboard event data.
#[derive(Debug, Clone, Default)]
pub struct KeyboardEventData {
    /// Key value (e.g., "a", "Enter", "ArrowLeft", " ").
    pub key: String,
    /// Key code (e.g., "KeyA", "Enter", "Space").
    pub code: String,
    /// Whether key is held down (repeat).
    pub repeat: bool,
    /// Modifier keys.
    pub modifiers: ModifierKeys,
}

impl KeyboardEventData {
    /// Event data for a named key, deriving the code the way browsers do.
    pub fn for_key(key: &str) -> Self {
        let code = match key {
            " " => String::from("Space"),
            k if k.chars().count() == 1 => {
                let c = k.chars().next().unwrap_or(' ');
                if c.is_ascii_digit() {
                    alloc::format!("Digit{}", c)
                } else if c.is_ascii_alphabetic() {
                    alloc::format!("Key{}", c.to_ascii_uppercase())
                } else {
                    String::from(k)
                }
            }
            k => String::from(k),
        };
        KeyboardEventData {
            key: key.into(),
            code,
            ..Default::default()
        }
    }
}

/// Input event data.
#[derive(Debug, Clone, Default)]
pub struct InputEventData {
    pub data: Option<String>,
    pub input_type: String,
    pub is_composing: bool,
}

/// Event listener options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Listen during capture phase.
    pub capture: bool,
    /// Remove listener after first invocation.
    pub once: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        ListenerOptions {
            capture: true,
            once: false,
        }
    }

    pub fn once() -> Self {
        ListenerOptions {
            capture: false,
            once: true,
        }
    }
}

/// Event handler callback type.
pub type EventHandler = Rc<dyn Fn(&mut Event)>;

/// Listener handle returned on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Event listener entry.
struct EventListener {
    /// Handler function.
    handler: EventHandler,
    /// Listener options.
    options: ListenerOptions,
    /// Unique ID.
    id: ListenerId,
}

/// Listeners attached to one node.
#[derive(Default)]
pub struct EventTarget {
    /// Listeners by event type.
    listeners: HashMap<EventType, Vec<EventListener>>,
}

impl EventTarget {
    /// Create new event target.
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, event_type: EventType, listener: EventListener) {
        self.listeners.entry(event_type).or_default().push(listener);
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        for listeners in self.listeners.values_mut() {
            if let Some(pos) = listeners.iter().position(|l| l.id == id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Snapshot handlers for one phase, retiring `once` listeners.
    fn take_phase(&mut self, event_type: EventType, capture: bool) -> Vec<EventHandler> {
        let listeners = match self.listeners.get_mut(&event_type) {
            Some(l) => l,
            None => return Vec::new(),
        };
        let handlers = listeners
            .iter()
            .filter(|l| l.options.capture == capture)
            .map(|l| l.handler.clone())
            .collect();
        listeners.retain(|l| !(l.options.once && l.options.capture == capture));
        handlers
    }

    /// Check if has listeners for event type.
    pub fn has_listeners(&self, event_type: EventType) -> bool {
        self.listeners
            .get(&event_type)
            .map(|l| !l.is_empty())
            .unwrap_or(false)
    }

    fn is_empty(&self) -> bool {
        self.listeners.values().all(|l| l.is_empty())
    }
}

/// One scheduled handler invocation.
struct Invocation {
    node: NodeId,
    phase: EventPhase,
    handler: EventHandler,
}

/// Handlers collected for one event, ready to run.
pub struct DispatchPlan {
    invocations: Vec<Invocation>,
    path: Vec<NodeId>,
}

impl DispatchPlan {
    /// Number of scheduled handler calls.
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    /// Invoke the handlers in propagation order.
    ///
    /// Returns `true` unless a handler prevented the default action.
    pub fn run(self, event: &mut Event) -> bool {
        event.path = self.path;
        let mut current: Option<NodeId> = None;
        for invocation in self.invocations {
            if current != Some(invocation.node) {
                // Moving to the next node honours stop_propagation.
                if event.propagation_stopped {
                    break;
                }
                current = Some(invocation.node);
            } else if event.immediate_propagation_stopped {
                break;
            }
            event.phase = invocation.phase;
            event.current_target = Some(invocation.node);
            (invocation.handler)(event);
        }
        event.phase = EventPhase::None;
        event.current_target = None;
        !event.default_prevented
    }
}

/// Event dispatcher for the DOM.
pub struct EventDispatcher {
    /// Event targets by node ID.
    targets: BTreeMap<NodeId, EventTarget>,
    /// Owning node of each listener.
    owners: BTreeMap<ListenerId, NodeId>,
    /// Next listener ID.
    next_id: u64,
}

impl EventDispatcher {
    /// Create new dispatcher.
    pub fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
            owners: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a listener on `node_id`.
    pub fn add_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: EventType,
        handler: EventHandler,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.targets.entry(node_id).or_default().add(
            event_type,
            EventListener {
                handler,
                options,
                id,
            },
        );
        self.owners.insert(id, node_id);
        id
    }

    /// Remove a listener by ID.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let node_id = match self.owners.remove(&id) {
            Some(n) => n,
            None => return false,
        };
        let removed = self
            .targets
            .get_mut(&node_id)
            .map(|t| t.remove(id))
            .unwrap_or(false);
        if self.targets.get(&node_id).map(|t| t.is_empty()).unwrap_or(false) {
            self.targets.remove(&node_id);
        }
        removed
    }

    /// Check if a node has listeners for an event type.
    pub fn has_listeners(&self, node_id: NodeId, event_type: EventType) -> bool {
        self.targets
            .get(&node_id)
            .map(|t| t.has_listeners(event_type))
            .unwrap_or(false)
    }

    /// Collect the handlers an event would reach along `path`.
    ///
    /// `path[0]` is the target; the rest are its ancestors, nearest first.
    pub fn plan(&mut self, event: &Event, path: &[NodeId]) -> DispatchPlan {
        let mut invocations = Vec::new();
        let (target, ancestors) = match path.split_first() {
            Some(split) => split,
            None => {
                return DispatchPlan {
                    invocations,
                    path: Vec::new(),
                }
            }
        };
        let event_type = event.event_type;

        let mut collect = |targets: &mut BTreeMap<NodeId, EventTarget>,
                           node: NodeId,
                           phase: EventPhase,
                           capture: bool| {
            if let Some(t) = targets.get_mut(&node) {
                for handler in t.take_phase(event_type, capture) {
                    invocations.push(Invocation {
                        node,
                        phase,
                        handler,
                    });
                }
            }
        };

        // Capture phase (from root to target)
        for &node in ancestors.iter().rev() {
            collect(&mut self.targets, node, EventPhase::Capturing, true);
        }

        // At target phase
        collect(&mut self.targets, *target, EventPhase::AtTarget, true);
        collect(&mut self.targets, *target, EventPhase::AtTarget, false);

        // Bubble phase (from target to root)
        if event.bubbles {
            for &node in ancestors {
                collect(&mut self.targets, node, EventPhase::Bubbling, false);
            }
        }

        DispatchPlan {
            invocations,
            path: path.to_vec(),
        }
    }

    /// Plan and run in one go.
    pub fn dispatch(&mut self, event: &mut Event, path: &[NodeId]) -> bool {
        let plan = self.plan(event, path);
        plan.run(event)
    }

    /// Remove all listeners for a node.
    pub fn remove_node(&mut self, node_id: NodeId) {
        if self.targets.remove(&node_id).is_some() {
            self.owners.retain(|_, owner| *owner != node_id);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
