//! Notification channel owned by the editor surface.

use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Events the editor surface emits to its subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The content changed (debounced or immediate).
    Change,
}

impl Notification {
    pub fn as_str(self) -> &'static str {
        match self {
            Notification::Change => "change",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by [`EventTarget::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Rc<dyn Fn(Notification)>;

/// Single-threaded listener registry.
///
/// Listeners may subscribe or unsubscribe from inside a dispatch; the change
/// takes effect on the next dispatch.
#[derive(Default)]
pub struct EventTarget {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Notification, Listener)>>,
}

impl EventTarget {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn subscribe<F>(&self, kind: Notification, listener: F) -> ListenerId
    where
        F: Fn(Notification) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, kind, Rc::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(k, _, _)| *k != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Calls every listener registered for `kind`; returns how many ran.
    pub fn dispatch(&self, kind: Notification) -> usize {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        debug!(target: "editor.change", "dispatch {kind} to {} listeners", matching.len());
        for listener in &matching {
            listener(kind);
        }
        matching.len()
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_subscribers_until_they_leave() {
        let target = EventTarget::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = target.subscribe(Notification::Change, move |_| counter.set(counter.get() + 1));

        assert_eq!(target.dispatch(Notification::Change), 1);
        assert!(target.unsubscribe(id));
        assert!(!target.unsubscribe(id));
        assert_eq!(target.dispatch(Notification::Change), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_can_subscribe_during_dispatch() {
        let target = EventTarget::new();
        let inner = Rc::clone(&target);
        target.subscribe(Notification::Change, move |_| {
            inner.subscribe(Notification::Change, |_| {});
        });
        assert_eq!(target.dispatch(Notification::Change), 1);
        assert_eq!(target.listener_count(), 2);
    }
}
