// Keyboard push device fed by winit key events

use super::device::{Code, DeviceListenerRef, DevicePush, InputDevice};
use super::push_state::PushState;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

// Virtual key codes, matching the classic desktop VK_* numbering
pub const KEY_ESCAPE: Code = 27;
pub const KEY_SPACE: Code = 32;
pub const KEY_LEFT: Code = 37;
pub const KEY_UP: Code = 38;
pub const KEY_RIGHT: Code = 39;
pub const KEY_DOWN: Code = 40;
pub const KEY_A: Code = 65;
pub const KEY_D: Code = 68;
pub const KEY_J: Code = 74;
pub const KEY_K: Code = 75;
pub const KEY_S: Code = 83;
pub const KEY_W: Code = 87;

/// Default physical key layout: WASD + arrows, Space, J, K, Escape
pub fn default_key_map() -> Vec<(KeyCode, Code, char)> {
    vec![
        // Movement (WASD - standard gaming layout)
        (KeyCode::KeyA, KEY_A, 'A'),
        (KeyCode::KeyD, KEY_D, 'D'),
        (KeyCode::KeyW, KEY_W, 'W'),
        (KeyCode::KeyS, KEY_S, 'S'),
        // Movement (arrows)
        (KeyCode::ArrowLeft, KEY_LEFT, '←'),
        (KeyCode::ArrowRight, KEY_RIGHT, '→'),
        (KeyCode::ArrowUp, KEY_UP, '↑'),
        (KeyCode::ArrowDown, KEY_DOWN, '↓'),
        // Fire buttons
        (KeyCode::Space, KEY_SPACE, ' '),
        (KeyCode::KeyJ, KEY_J, 'J'),
        (KeyCode::KeyK, KEY_K, 'K'),
        (KeyCode::Escape, KEY_ESCAPE, '\0'),
    ]
}

/// A keyboard exposed as a push device
///
/// Only mapped keys are tracked. OS key repeats are ignored so listeners see
/// one press and one release per physical stroke. Several keys may share a
/// code; the code stays pushed until the last of them is released.
#[derive(Debug)]
pub struct KeyboardPush {
    name: String,
    keys: HashMap<KeyCode, (Code, char)>,
    held: RefCell<HashSet<KeyCode>>,
    state: PushState,
}

impl KeyboardPush {
    /// Create a keyboard with no mapped keys
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: HashMap::new(),
            held: RefCell::new(HashSet::new()),
            state: PushState::new(0),
        }
    }

    /// Create a keyboard mapped with `default_key_map`
    pub fn with_default_keys(name: impl Into<String>) -> Self {
        let mut keyboard = Self::new(name);
        for (key, code, repr) in default_key_map() {
            keyboard.map_key(key, code, repr);
        }
        keyboard
    }

    /// Map a physical key to a code, replacing any previous mapping of that key
    pub fn map_key(&mut self, key: KeyCode, code: Code, repr: char) {
        self.keys.insert(key, (code, repr));
    }

    /// Remove a key mapping
    pub fn unmap_key(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    /// Get the code a physical key is mapped to
    pub fn code_for(&self, key: KeyCode) -> Option<Code> {
        self.keys.get(&key).map(|(code, _)| *code)
    }

    /// Process a keyboard event from winit
    /// Returns true if the event changed the device state
    pub fn process_event(&self, event: &KeyEvent) -> bool {
        // Only process physical key presses
        let PhysicalKey::Code(key) = event.physical_key else {
            return false;
        };
        match event.state {
            ElementState::Pressed if event.repeat => false,
            ElementState::Pressed => self.press_key(key),
            ElementState::Released => self.release_key(key),
        }
    }

    /// Register a key press
    pub fn press_key(&self, key: KeyCode) -> bool {
        let Some(&(code, repr)) = self.keys.get(&key) else {
            return false;
        };
        self.held.borrow_mut().insert(key);
        self.state.press(code, repr)
    }

    /// Register a key release
    /// The code is only released once no other held key maps to it
    pub fn release_key(&self, key: KeyCode) -> bool {
        let Some(&(code, repr)) = self.keys.get(&key) else {
            return false;
        };
        let still_held = {
            let mut held = self.held.borrow_mut();
            held.remove(&key);
            let shared = held
                .iter()
                .filter_map(|other| self.keys.get(other))
                .any(|&(other_code, _)| other_code == code);
            shared
        };
        if still_held {
            return false;
        }
        self.state.release(code, repr)
    }

    /// Release every held key, e.g. when the window loses focus
    pub fn release_all(&self) {
        self.held.borrow_mut().clear();
        let reprs: HashMap<Code, char> = self.keys.values().copied().collect();
        self.state
            .release_all(|code| reprs.get(&code).copied().unwrap_or('\0'));
    }
}

impl InputDevice for KeyboardPush {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_listener(&self, listener: DeviceListenerRef) {
        self.state.add_listener(listener);
    }

    fn remove_listener(&self, listener: &DeviceListenerRef) {
        self.state.remove_listener(listener);
    }

    fn update(&self, _dt: f32) -> anyhow::Result<()> {
        // Key events are pushed in by the event loop
        Ok(())
    }

    fn set_visible(&self, visible: bool) {
        self.state.set_visible(visible);
    }
}

impl DevicePush for KeyboardPush {
    fn is_any_pushed(&self) -> bool {
        self.state.is_any_pushed()
    }

    fn pushed(&self) -> Option<Code> {
        self.state.pushed()
    }

    fn is_pushed(&self, code: Code) -> bool {
        self.state.is_pushed(code)
    }

    fn is_pushed_once(&self, code: Code) -> bool {
        self.state.is_pushed_once(code)
    }
}
