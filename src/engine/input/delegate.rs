// Controller that forwards to whichever controller is active right now

use super::action::ActionRef;
use super::controller::{ControllerListenerRef, DeviceController, FireIndex, SharedController};
use super::device::{Code, DeviceRef};
use super::Result;
use std::fmt;

/// Forwards every call to the controller its provider returns at call time
///
/// Lets call sites hold one controller while game states swap the real one
/// underneath. Nothing is cached; the provider runs on every call.
///
/// The active controller is mutably borrowed while a call is forwarded, so a
/// controller listener must not call back into the same delegate.
pub struct ControllerDelegate {
    provider: Box<dyn Fn() -> SharedController>,
}

impl ControllerDelegate {
    pub fn new(provider: impl Fn() -> SharedController + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// The controller calls are currently forwarded to
    pub fn current(&self) -> SharedController {
        (self.provider)()
    }

    fn with<R>(&self, f: impl FnOnce(&dyn DeviceController) -> R) -> R {
        let controller = self.current();
        let guard = controller.borrow();
        f(&*guard)
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut dyn DeviceController) -> R) -> R {
        let controller = self.current();
        let mut guard = controller.borrow_mut();
        f(&mut *guard)
    }
}

impl fmt::Debug for ControllerDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDelegate").finish_non_exhaustive()
    }
}

impl DeviceController for ControllerDelegate {
    fn add_horizontal(&mut self, device: DeviceRef, action: ActionRef) -> Result<()> {
        self.with_mut(|c| c.add_horizontal(device, action))
    }

    fn add_vertical(&mut self, device: DeviceRef, action: ActionRef) -> Result<()> {
        self.with_mut(|c| c.add_vertical(device, action))
    }

    fn add_fire(
        &mut self,
        name: &str,
        device: DeviceRef,
        index: FireIndex,
        code: Code,
        action: ActionRef,
    ) -> Result<()> {
        self.with_mut(|c| c.add_fire(name, device, index, code, action))
    }

    fn set_visible(&mut self, visible: bool) {
        self.with_mut(|c| c.set_visible(visible))
    }

    fn set_disabled(&mut self, device_name: &str, horizontal: bool, vertical: bool) {
        self.with_mut(|c| c.set_disabled(device_name, horizontal, vertical))
    }

    fn horizontal_direction(&self) -> f64 {
        self.with(|c| c.horizontal_direction())
    }

    fn vertical_direction(&self) -> f64 {
        self.with(|c| c.vertical_direction())
    }

    fn is_any_fired(&self) -> bool {
        self.with(|c| c.is_any_fired())
    }

    fn fired(&self) -> Option<FireIndex> {
        self.with(|c| c.fired())
    }

    fn is_fired(&self, index: FireIndex) -> bool {
        self.with(|c| c.is_fired(index))
    }

    fn is_fired_once(&mut self, index: FireIndex) -> bool {
        self.with_mut(|c| c.is_fired_once(index))
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        self.with_mut(|c| c.update(dt))
    }

    fn add_listener(&mut self, listener: ControllerListenerRef) {
        self.with_mut(|c| c.add_listener(listener))
    }

    fn remove_listener(&mut self, listener: &ControllerListenerRef) {
        self.with_mut(|c| c.remove_listener(listener))
    }

    fn clear(&mut self) {
        self.with_mut(|c| c.clear())
    }
}
