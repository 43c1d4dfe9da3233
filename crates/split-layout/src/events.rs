// ABOUTME: Single-threaded notification bus for pointer and resize input.
// ABOUTME: Subscriptions are guards that unsubscribe when dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use split_core::Point;

/// Input a layout reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// Pointer pressed on the grab band of a splitter
    PointerDown { splitter: usize },
    PointerMove(Point),
    PointerUp,
    /// The host viewport changed size
    ViewportResized,
    /// Some layout resized its panes by dragging; nested layouts re-measure
    SplitterResized,
}

pub trait Listener {
    fn notify(&mut self, notification: &Notification);
}

struct FnListener<F>(F);

impl<F: FnMut(&Notification)> Listener for FnListener<F> {
    fn notify(&mut self, notification: &Notification) {
        (self.0)(notification)
    }
}

type Entry = (u64, Rc<RefCell<dyn Listener>>);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Delivers notifications to every live subscription, in subscription order.
///
/// Cloning a dispatcher yields another handle to the same set of listeners.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Rc<RefCell<dyn Listener>>) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn subscribe_fn(&self, f: impl FnMut(&Notification) + 'static) -> Subscription {
        self.subscribe(Rc::new(RefCell::new(FnListener(f))))
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Deliver a notification, returning how many listeners received it.
    ///
    /// Listeners may subscribe, unsubscribe or dispatch again while handling.
    /// A nested dispatch skips listeners that are still busy with the outer one.
    pub fn dispatch(&self, notification: Notification) -> usize {
        let snapshot: Vec<Entry> = self.registry.borrow().entries.clone();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut listener) => {
                    listener.notify(&notification);
                    delivered += 1;
                }
                Err(_) => {
                    tracing::trace!("Listener {} busy, skipping {:?}", id, notification);
                }
            }
        }
        delivered
    }

    pub(crate) fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher {
            registry: Rc::downgrade(&self.registry),
        }
    }
}

/// Non-owning dispatcher handle, held by listeners that re-dispatch
#[derive(Clone)]
pub(crate) struct WeakDispatcher {
    registry: Weak<RefCell<Registry>>,
}

impl WeakDispatcher {
    pub(crate) fn upgrade(&self) -> Option<Dispatcher> {
        self.registry.upgrade().map(|registry| Dispatcher { registry })
    }
}

/// Keeps a listener registered until dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            // Listener may still be borrowed by a running dispatch; it is
            // removed from the registry and dropped once the snapshot ends.
            let removed = {
                let mut registry = registry.borrow_mut();
                let position = registry
                    .entries
                    .iter()
                    .position(|(id, _)| *id == self.id);
                position.map(|position| registry.entries.remove(position))
            };
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn delivers_to_subscribers() {
        let dispatcher = Dispatcher::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let _sub = dispatcher.subscribe_fn(move |n| sink.borrow_mut().push(*n));

        assert_eq!(dispatcher.dispatch(Notification::PointerUp), 1);
        assert_eq!(*seen.borrow(), vec![Notification::PointerUp]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let dispatcher = Dispatcher::new();
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        let sub = dispatcher.subscribe_fn(move |_| counter.set(counter.get() + 1));
        assert!(sub.is_active());
        assert_eq!(dispatcher.listener_count(), 1);

        drop(sub);
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.dispatch(Notification::ViewportResized), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscription_outliving_dispatcher_is_inert() {
        let dispatcher = Dispatcher::new();
        let sub = dispatcher.subscribe_fn(|_| {});
        drop(dispatcher);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn nested_dispatch_skips_busy_listener() {
        let dispatcher = Dispatcher::new();
        let outer_calls = Rc::new(Cell::new(0));
        let other_calls = Rc::new(RefCell::new(Vec::new()));

        let weak = dispatcher.downgrade();
        let calls = outer_calls.clone();
        let _outer = dispatcher.subscribe_fn(move |n| {
            calls.set(calls.get() + 1);
            if *n == Notification::PointerUp {
                if let Some(bus) = weak.upgrade() {
                    bus.dispatch(Notification::SplitterResized);
                }
            }
        });

        let sink = other_calls.clone();
        let _other = dispatcher.subscribe_fn(move |n| sink.borrow_mut().push(*n));

        dispatcher.dispatch(Notification::PointerUp);

        assert_eq!(outer_calls.get(), 1);
        assert_eq!(
            *other_calls.borrow(),
            vec![Notification::SplitterResized, Notification::PointerUp]
        );
    }

    #[test]
    fn unsubscribe_during_dispatch_stops_delivery() {
        let dispatcher = Dispatcher::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_calls = Rc::new(Cell::new(0));

        let slot = victim.clone();
        let _killer = dispatcher.subscribe_fn(move |_| {
            slot.borrow_mut().take();
        });

        let calls = victim_calls.clone();
        *victim.borrow_mut() =
            Some(dispatcher.subscribe_fn(move |_| calls.set(calls.get() + 1)));

        assert_eq!(dispatcher.dispatch(Notification::PointerUp), 1);
        assert_eq!(victim_calls.get(), 0);
    }
}
