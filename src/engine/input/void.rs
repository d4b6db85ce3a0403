// Controller that ignores everything

use super::action::ActionRef;
use super::controller::{ControllerListenerRef, DeviceController, FireIndex, SharedController};
use super::device::{Code, DeviceRef};
use super::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// No-op controller for menus, cutscenes and headless runs
///
/// Registrations are accepted and dropped; every query is neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoidController;

impl VoidController {
    /// A void controller behind a shared handle, ready for a delegate
    pub fn shared() -> SharedController {
        Rc::new(RefCell::new(VoidController))
    }
}

impl DeviceController for VoidController {
    fn add_horizontal(&mut self, _device: DeviceRef, _action: ActionRef) -> Result<()> {
        Ok(())
    }

    fn add_vertical(&mut self, _device: DeviceRef, _action: ActionRef) -> Result<()> {
        Ok(())
    }

    fn add_fire(
        &mut self,
        _name: &str,
        _device: DeviceRef,
        _index: FireIndex,
        _code: Code,
        _action: ActionRef,
    ) -> Result<()> {
        Ok(())
    }

    fn set_visible(&mut self, _visible: bool) {}

    fn set_disabled(&mut self, _device_name: &str, _horizontal: bool, _vertical: bool) {}

    fn horizontal_direction(&self) -> f64 {
        0.0
    }

    fn vertical_direction(&self) -> f64 {
        0.0
    }

    fn is_any_fired(&self) -> bool {
        false
    }

    fn fired(&self) -> Option<FireIndex> {
        None
    }

    fn is_fired(&self, _index: FireIndex) -> bool {
        false
    }

    fn is_fired_once(&mut self, _index: FireIndex) -> bool {
        false
    }

    fn update(&mut self, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn add_listener(&mut self, _listener: ControllerListenerRef) {}

    fn remove_listener(&mut self, _listener: &ControllerListenerRef) {}

    fn clear(&mut self) {}
}
