// Pressed-code bookkeeping shared by push devices

use super::device::{Code, DeviceListener, DeviceListenerRef};
use super::listener::ListenerList;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Pressed state of one push device
///
/// Tracks which codes are held, which presses were already reported through
/// `is_pushed_once`, and the device listeners to tell about transitions.
/// Listeners run after every internal borrow is released, so a callback may
/// query the device that fired it.
#[derive(Debug)]
pub struct PushState {
    /// Device unit index reported to listeners
    index: i32,

    /// Codes currently pressed, oldest press first
    pressed: RefCell<Vec<Code>>,

    /// Pressed codes already reported by `is_pushed_once`
    reported: RefCell<HashSet<Code>>,

    listeners: ListenerList<dyn DeviceListener>,

    visible: Cell<bool>,
}

impl PushState {
    /// Create an empty state for device unit `index`
    pub fn new(index: i32) -> Self {
        Self {
            index,
            pressed: RefCell::new(Vec::new()),
            reported: RefCell::new(HashSet::new()),
            listeners: ListenerList::new(),
            visible: Cell::new(true),
        }
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Register a press
    /// Returns true if the code was not already pressed
    pub fn press(&self, code: Code, repr: char) -> bool {
        {
            let mut pressed = self.pressed.borrow_mut();
            if pressed.contains(&code) {
                return false;
            }
            pressed.push(code);
        }
        self.listeners
            .notify(|l| l.on_state_changed(self.index, code, repr, true));
        true
    }

    /// Register a release
    /// Returns true if the code was pressed
    pub fn release(&self, code: Code, repr: char) -> bool {
        {
            let mut pressed = self.pressed.borrow_mut();
            let Some(pos) = pressed.iter().position(|c| *c == code) else {
                return false;
            };
            pressed.remove(pos);
            self.reported.borrow_mut().remove(&code);
        }
        self.listeners
            .notify(|l| l.on_state_changed(self.index, code, repr, false));
        true
    }

    /// Press or release depending on `active`
    pub fn set(&self, code: Code, repr: char, active: bool) -> bool {
        if active {
            self.press(code, repr)
        } else {
            self.release(code, repr)
        }
    }

    pub fn is_pushed(&self, code: Code) -> bool {
        self.pressed.borrow().contains(&code)
    }

    pub fn is_any_pushed(&self) -> bool {
        !self.pressed.borrow().is_empty()
    }

    /// The oldest code still held down
    pub fn pushed(&self) -> Option<Code> {
        self.pressed.borrow().first().copied()
    }

    /// Edge-triggered read of a code
    pub fn is_pushed_once(&self, code: Code) -> bool {
        if !self.is_pushed(code) {
            return false;
        }
        self.reported.borrow_mut().insert(code)
    }

    /// Get all currently pressed codes, oldest first
    pub fn pressed_codes(&self) -> Vec<Code> {
        self.pressed.borrow().clone()
    }

    /// Release every pressed code, notifying listeners for each
    pub fn release_all(&self, repr: impl Fn(Code) -> char) {
        for code in self.pressed_codes() {
            self.release(code, repr(code));
        }
    }

    pub fn add_listener(&self, listener: DeviceListenerRef) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&self, listener: &DeviceListenerRef) {
        self.listeners.remove(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}

impl Default for PushState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder(state: &PushState) -> Rc<RefCell<Vec<(Code, bool)>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        state.add_listener(Rc::new(
            move |_index: i32, code: Code, _repr: char, active: bool| {
                sink.borrow_mut().push((code, active));
            },
        ));
        events
    }

    #[test]
    fn test_press_and_release() {
        let state = PushState::new(0);
        assert!(state.press(10, '\0'));
        assert!(state.is_pushed(10));
        assert!(state.is_any_pushed());

        assert!(state.release(10, '\0'));
        assert!(!state.is_pushed(10));
        assert!(!state.is_any_pushed());
    }

    #[test]
    fn test_repeated_press_notifies_once() {
        let state = PushState::new(0);
        let events = recorder(&state);

        assert!(state.press(10, '\0'));
        assert!(!state.press(10, '\0'));
        assert_eq!(events.borrow().as_slice(), &[(10, true)]);
    }

    #[test]
    fn test_release_unpressed_code() {
        let state = PushState::new(0);
        let events = recorder(&state);

        assert!(!state.release(10, '\0'));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_pushed_is_oldest_press() {
        let state = PushState::new(0);
        state.press(7, '\0');
        state.press(3, '\0');
        assert_eq!(state.pushed(), Some(7));

        state.release(7, '\0');
        assert_eq!(state.pushed(), Some(3));

        state.release(3, '\0');
        assert_eq!(state.pushed(), None);
    }

    #[test]
    fn test_pushed_once_rearms_on_release() {
        let state = PushState::new(0);
        state.press(5, '\0');
        assert!(state.is_pushed_once(5));
        assert!(!state.is_pushed_once(5));

        state.release(5, '\0');
        assert!(!state.is_pushed_once(5));

        state.press(5, '\0');
        assert!(state.is_pushed_once(5));
    }

    #[test]
    fn test_listener_reports_index() {
        let state = PushState::new(2);
        let seen = Rc::new(Cell::new(-1));
        let sink = seen.clone();
        state.add_listener(Rc::new(
            move |index: i32, _code: Code, _repr: char, _active: bool| sink.set(index),
        ));

        state.press(1, '\0');
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_listener_can_query_state() {
        let state = Rc::new(PushState::new(0));
        let seen = Rc::new(Cell::new(false));
        let (inner, sink) = (Rc::downgrade(&state), seen.clone());
        state.add_listener(Rc::new(
            move |_index: i32, code: Code, _repr: char, _active: bool| {
                if let Some(state) = inner.upgrade() {
                    sink.set(state.is_pushed(code));
                }
            },
        ));

        state.press(9, '\0');
        assert!(seen.get(), "Listener should see the new state");
    }

    #[test]
    fn test_release_all() {
        let state = PushState::new(0);
        let events = recorder(&state);
        state.press(1, '\0');
        state.press(2, '\0');

        state.release_all(|_| '\0');
        assert!(!state.is_any_pushed());
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn test_visibility() {
        let state = PushState::default();
        assert!(state.is_visible());
        state.set_visible(false);
        assert!(!state.is_visible());
    }
}
