//! Typed lifecycle events and the listener registry.
//!
//! The controller owns an [`EventDispatcher`] and exposes delegating
//! `add_event_listener` / `remove_event_listener` methods. Listener lists
//! are snapshotted before each dispatch, so a listener may add or remove
//! listeners (including itself) while being called.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Controller lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlsEvent {
    /// A user drag or held-key gesture began.
    ControlStart,
    /// User input changed the camera (drag sample, wheel tick, key tick).
    Control,
    /// The user gesture ended.
    ControlEnd,
    /// A mutator started a transition toward a new end state.
    TransitionStart,
    /// The camera moved this tick.
    Update,
    /// The camera started moving after being asleep.
    Wake,
    /// Every degree of freedom settled within the rest threshold.
    Rest,
    /// The camera stopped moving entirely.
    Sleep,
}

impl ControlsEvent {
    /// Every event type.
    pub const ALL: [Self; 8] = [
        Self::ControlStart,
        Self::Control,
        Self::ControlEnd,
        Self::TransitionStart,
        Self::Update,
        Self::Wake,
        Self::Rest,
        Self::Sleep,
    ];

    /// Lower-case DOM-style event name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ControlStart => "controlstart",
            Self::Control => "control",
            Self::ControlEnd => "controlend",
            Self::TransitionStart => "transitionstart",
            Self::Update => "update",
            Self::Wake => "wake",
            Self::Rest => "rest",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for ControlsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`EventDispatcher::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(ControlsEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: FxHashMap<ControlsEvent, Vec<(ListenerId, Listener)>>,
}

/// Single-threaded pub/sub for [`ControlsEvent`]s.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let count: usize = registry.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventDispatcher")
            .field("listeners", &count)
            .finish()
    }
}

impl EventDispatcher {
    /// Empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`.
    pub fn add_listener<F>(&self, event: ControlsEvent, listener: F) -> ListenerId
    where
        F: FnMut(ControlsEvent) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry
            .listeners
            .entry(event)
            .or_default()
            .push((id, listener));
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, event: ControlsEvent, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(list) = registry.listeners.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        before != list.len()
    }

    /// Unregister every listener for `event`, or for all events with `None`.
    pub fn remove_all(&self, event: Option<ControlsEvent>) {
        let mut registry = self.registry.borrow_mut();
        match event {
            Some(event) => {
                let _ = registry.listeners.remove(&event);
            }
            None => registry.listeners.clear(),
        }
    }

    /// Whether `id` is registered for `event`.
    #[must_use]
    pub fn has_listener(&self, event: ControlsEvent, id: ListenerId) -> bool {
        self.registry
            .borrow()
            .listeners
            .get(&event)
            .is_some_and(|list| list.iter().any(|(lid, _)| *lid == id))
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: ControlsEvent) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(&event)
            .map_or(0, Vec::len)
    }

    /// Call every listener registered for `event`, in registration order.
    pub fn dispatch(&self, event: ControlsEvent) {
        let snapshot: Vec<Listener> = match self.registry.borrow().listeners.get(&event) {
            Some(list) => list.iter().map(|(_, l)| Rc::clone(l)).collect(),
            None => return,
        };
        for listener in snapshot {
            match listener.try_borrow_mut() {
                Ok(mut f) => f(event),
                Err(_) => log::warn!("skipping re-entrant `{event}` listener"),
            }
        }
    }
}
