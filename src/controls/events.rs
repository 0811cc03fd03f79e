//! Publish/subscribe for controls notifications.
//!
//! Any controls type that owns an [`EventDispatcher`] satisfies the event
//! side of the [`Controls`](super::Controls) contract.

use std::cell::RefCell;
use std::rc::Rc;

/// Notifications emitted by controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlsEvent {
    /// The camera pose (or the controls' target) changed.
    Change,
    /// A user interaction began.
    Start,
    /// A user interaction ended.
    End,
}

/// Identifies a subscription for [`EventDispatcher::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Rc<RefCell<dyn FnMut(ControlsEvent)>>;

struct Listener {
    id: ListenerId,
    event: ControlsEvent,
    handler: Handler,
}

/// A list of event handlers, called in subscription order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`.
    pub fn subscribe(&mut self, event: ControlsEvent, handler: impl FnMut(ControlsEvent) + 'static) -> ListenerId {
        self.subscribe_shared(event, Rc::new(RefCell::new(handler)))
    }

    /// Registers one shared handler for several events.
    pub fn subscribe_many(
        &mut self,
        events: &[ControlsEvent],
        handler: impl FnMut(ControlsEvent) + 'static,
    ) -> Vec<ListenerId> {
        let handler: Handler = Rc::new(RefCell::new(handler));
        events
            .iter()
            .map(|&event| self.subscribe_shared(event, Rc::clone(&handler)))
            .collect()
    }

    fn subscribe_shared(&mut self, event: ControlsEvent, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, event, handler });
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Calls every handler subscribed to `event`.
    ///
    /// A handler that is already running (an emit from inside its own
    /// callback) is skipped rather than re-entered.
    pub fn emit(&self, event: ControlsEvent) {
        for listener in self.listeners.iter().filter(|l| l.event == event) {
            match listener.handler.try_borrow_mut() {
                Ok(mut handler) => handler(event),
                Err(_) => log::warn!("Skipping re-entrant {event:?} listener"),
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self, event: ControlsEvent) -> usize {
        self.listeners.iter().filter(|l| l.event == event).count()
    }
}
