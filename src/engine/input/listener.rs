// Observer registry with snapshot-then-notify dispatch

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Ordered list of listeners sharing one callback trait
///
/// `notify` clones the current list before calling anyone, so a listener may
/// add or remove listeners (itself included) from inside its callback. Such
/// changes apply to the next notification, never to the one in flight.
pub struct ListenerList<L: ?Sized> {
    listeners: RefCell<Vec<Rc<L>>>,
}

impl<L: ?Sized> ListenerList<L> {
    /// Create an empty listener list
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Add a listener. Adding the same `Rc` twice is a no-op.
    pub fn add(&self, listener: Rc<L>) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Remove a listener by identity
    /// Returns true if it was registered
    pub fn remove(&self, listener: &Rc<L>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    /// Check if a listener is registered
    pub fn contains(&self, listener: &Rc<L>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|l| same_listener(l, listener))
    }

    /// Call `f` once per listener, in registration order
    pub fn notify(&self, mut f: impl FnMut(&L)) {
        let snapshot: Vec<Rc<L>> = self.listeners.borrow().clone();
        for listener in &snapshot {
            f(listener);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerList<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish()
    }
}

// Identity only; vtable pointers of the same object may differ between codegen units
fn same_listener<L: ?Sized>(a: &Rc<L>, b: &Rc<L>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    trait Counter {
        fn hit(&self);
    }

    struct Hits(Cell<u32>);

    impl Counter for Hits {
        fn hit(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_add_and_notify() {
        let list: ListenerList<dyn Counter> = ListenerList::new();
        let hits = Rc::new(Hits(Cell::new(0)));
        list.add(hits.clone());

        list.notify(|l| l.hit());
        list.notify(|l| l.hit());

        assert_eq!(hits.0.get(), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_same_listener_twice() {
        let list: ListenerList<dyn Counter> = ListenerList::new();
        let hits = Rc::new(Hits(Cell::new(0)));
        let as_dyn: Rc<dyn Counter> = hits.clone();
        list.add(as_dyn.clone());
        list.add(as_dyn);

        list.notify(|l| l.hit());
        assert_eq!(hits.0.get(), 1, "Listener should only be called once");
    }

    #[test]
    fn test_remove() {
        let list: ListenerList<dyn Counter> = ListenerList::new();
        let hits: Rc<dyn Counter> = Rc::new(Hits(Cell::new(0)));
        list.add(hits.clone());

        assert!(list.contains(&hits));
        assert!(list.remove(&hits));
        assert!(!list.remove(&hits));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_during_notify_applies_next_time() {
        let list: Rc<ListenerList<dyn Fn()>> = Rc::new(ListenerList::new());
        let calls = Rc::new(Cell::new(0));

        let self_slot: Rc<RefCell<Option<Rc<dyn Fn()>>>> = Rc::new(RefCell::new(None));
        let listener: Rc<dyn Fn()> = {
            let list = list.clone();
            let calls = calls.clone();
            let self_slot = self_slot.clone();
            Rc::new(move || {
                calls.set(calls.get() + 1);
                if let Some(me) = self_slot.borrow().as_ref() {
                    list.remove(me);
                }
            })
        };
        *self_slot.borrow_mut() = Some(listener.clone());
        list.add(listener);

        list.notify(|l| l());
        list.notify(|l| l());

        assert_eq!(calls.get(), 1);
        assert!(list.is_empty());
        // Break the cycle between the listener and its own slot
        self_slot.borrow_mut().take();
    }

    #[test]
    fn test_notify_in_registration_order() {
        let list: ListenerList<dyn Fn(&mut Vec<u8>)> = ListenerList::new();
        list.add(Rc::new(|v: &mut Vec<u8>| v.push(1)));
        list.add(Rc::new(|v: &mut Vec<u8>| v.push(2)));

        let mut order = Vec::new();
        list.notify(|l| l(&mut order));
        assert_eq!(order, vec![1, 2]);
    }
}
