// Software-driven push device (on-screen buttons, scripted input)

use super::device::{code_char, Code, DeviceListenerRef, DevicePush, InputDevice};
use super::push_state::PushState;

/// A push device whose codes are pressed and released by code, not hardware
///
/// Listeners hear about real transitions only: pressing a code that is
/// already held does nothing.
#[derive(Debug)]
pub struct VirtualPush {
    name: String,
    state: PushState,
}

impl VirtualPush {
    /// Create a virtual device reporting unit index 0
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_index(name, 0)
    }

    /// Create a virtual device reporting unit `index` to its listeners
    pub fn with_index(name: impl Into<String>, index: i32) -> Self {
        Self {
            name: name.into(),
            state: PushState::new(index),
        }
    }

    /// Press a code
    /// Returns true if this changed the device state
    pub fn press(&self, code: Code) -> bool {
        self.state.press(code, code_char(code))
    }

    /// Release a code
    /// Returns true if this changed the device state
    pub fn release(&self, code: Code) -> bool {
        self.state.release(code, code_char(code))
    }

    pub fn set_pushed(&self, code: Code, active: bool) -> bool {
        self.state.set(code, code_char(code), active)
    }

    /// Release everything, e.g. when the on-screen pad is hidden
    pub fn release_all(&self) {
        self.state.release_all(code_char);
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn listener_count(&self) -> usize {
        self.state.listener_count()
    }
}

impl InputDevice for VirtualPush {
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
        // State changes are applied as they happen
        Ok(())
    }

    fn set_visible(&self, visible: bool) {
        self.state.set_visible(visible);
    }
}

impl DevicePush for VirtualPush {
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
