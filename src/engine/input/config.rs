// Control schemes: declarative bindings applied to a controller

use super::action::{ButtonAction, DigitalAxisAction};
use super::controller::{DeviceController, FireIndex};
use super::device::{Code, DevicePush, DeviceRef, PushRef};
use super::keyboard::{
    KEY_A, KEY_D, KEY_DOWN, KEY_ESCAPE, KEY_J, KEY_K, KEY_LEFT, KEY_RIGHT, KEY_S, KEY_SPACE,
    KEY_UP, KEY_W,
};
use super::Result;
use std::rc::Rc;

/// Fire index conventions used by the default schemes
pub const FIRE_JUMP: FireIndex = 0;
pub const FIRE_ATTACK: FireIndex = 1;
pub const FIRE_SPECIAL: FireIndex = 2;
pub const FIRE_MENU: FireIndex = 3;

/// A pair of codes folded into one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisBinding {
    pub positive: Code,
    pub negative: Code,
}

/// One code bound to a fire index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FireBinding {
    pub index: FireIndex,
    pub code: Code,
}

/// Bindings for one push device
///
/// A scheme only describes codes; `apply` turns it into actions on a real
/// device and registers them with a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlScheme {
    horizontal: Vec<AxisBinding>,
    vertical: Vec<AxisBinding>,
    fires: Vec<FireBinding>,
}

impl ControlScheme {
    /// Create an empty scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD and arrows on the axes, Space/J/K/Escape on fire indices 0-3
    ///
    /// Up is the positive vertical direction.
    pub fn keyboard_default() -> Self {
        let mut scheme = Self::new();
        scheme.bind_horizontal(KEY_D, KEY_A);
        scheme.bind_horizontal(KEY_RIGHT, KEY_LEFT);
        scheme.bind_vertical(KEY_W, KEY_S);
        scheme.bind_vertical(KEY_UP, KEY_DOWN);
        scheme.bind_fire(FIRE_JUMP, KEY_SPACE);
        scheme.bind_fire(FIRE_ATTACK, KEY_J);
        scheme.bind_fire(FIRE_SPECIAL, KEY_K);
        scheme.bind_fire(FIRE_MENU, KEY_ESCAPE);
        scheme
    }

    pub fn bind_horizontal(&mut self, positive: Code, negative: Code) {
        self.horizontal.push(AxisBinding { positive, negative });
    }

    pub fn bind_vertical(&mut self, positive: Code, negative: Code) {
        self.vertical.push(AxisBinding { positive, negative });
    }

    /// Bind a code to a fire index, replacing any previous binding of that code
    pub fn bind_fire(&mut self, index: FireIndex, code: Code) {
        self.unbind_code(code);
        self.fires.push(FireBinding { index, code });
    }

    /// Unbind a code from whatever fire index it drives
    pub fn unbind_code(&mut self, code: Code) {
        self.fires.retain(|b| b.code != code);
    }

    /// Unbind all codes of a fire index
    pub fn unbind_fire(&mut self, index: FireIndex) {
        self.fires.retain(|b| b.index != index);
    }

    /// Get the fire index a code drives
    pub fn fire_index(&self, code: Code) -> Option<FireIndex> {
        self.fires.iter().find(|b| b.code == code).map(|b| b.index)
    }

    /// Get all codes bound to a fire index
    pub fn fire_codes(&self, index: FireIndex) -> Vec<Code> {
        self.fires
            .iter()
            .filter(|b| b.index == index)
            .map(|b| b.code)
            .collect()
    }

    pub fn horizontal(&self) -> &[AxisBinding] {
        &self.horizontal
    }

    pub fn vertical(&self) -> &[AxisBinding] {
        &self.vertical
    }

    pub fn fires(&self) -> &[FireBinding] {
        &self.fires
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty() && self.fires.is_empty()
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.horizontal.clear();
        self.vertical.clear();
        self.fires.clear();
    }

    /// Register this scheme for a push device
    pub fn apply<P: DevicePush + 'static>(
        &self,
        controller: &mut dyn DeviceController,
        push: Rc<P>,
    ) -> Result<()> {
        self.apply_to(controller, push.clone(), push)
    }

    /// Register this scheme, with the device given as both of its faces
    ///
    /// `device` and `push` must be the same object.
    pub fn apply_to(
        &self,
        controller: &mut dyn DeviceController,
        device: DeviceRef,
        push: PushRef,
    ) -> Result<()> {
        for binding in &self.horizontal {
            let action = DigitalAxisAction::new(binding.positive, binding.negative, push.clone())?;
            controller.add_horizontal(device.clone(), Rc::new(action))?;
        }
        for binding in &self.vertical {
            let action = DigitalAxisAction::new(binding.positive, binding.negative, push.clone())?;
            controller.add_vertical(device.clone(), Rc::new(action))?;
        }

        let name = device.name().to_string();
        for binding in &self.fires {
            let action = ButtonAction::new(binding.code, push.clone());
            controller.add_fire(
                &name,
                device.clone(),
                binding.index,
                binding.code,
                Rc::new(action),
            )?;
        }

        log::debug!(
            "Applied control scheme to '{}': {} horizontal, {} vertical, {} fire bindings",
            name,
            self.horizontal.len(),
            self.vertical.len(),
            self.fires.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{ControlError, ControllerModel, KeyboardPush, VirtualPush};
    use std::cell::RefCell;
    use winit::keyboard::KeyCode;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_scheme_creation() {
        let scheme = ControlScheme::new();
        assert!(scheme.is_empty());
    }

    #[test]
    fn test_bind_fire() {
        let mut scheme = ControlScheme::new();
        scheme.bind_fire(FIRE_JUMP, KEY_SPACE);
        assert_eq!(scheme.fire_index(KEY_SPACE), Some(FIRE_JUMP));
    }

    #[test]
    fn test_rebind_code() {
        let mut scheme = ControlScheme::new();
        scheme.bind_fire(FIRE_JUMP, KEY_SPACE);
        scheme.bind_fire(FIRE_ATTACK, KEY_SPACE);

        assert_eq!(scheme.fire_index(KEY_SPACE), Some(FIRE_ATTACK));
        assert!(scheme.fire_codes(FIRE_JUMP).is_empty());
        assert_eq!(scheme.fires().len(), 1);
    }

    #[test]
    fn test_unbind_fire() {
        let mut scheme = ControlScheme::new();
        scheme.bind_fire(FIRE_JUMP, KEY_SPACE);
        scheme.bind_fire(FIRE_JUMP, KEY_W);
        assert_eq!(scheme.fire_codes(FIRE_JUMP), vec![KEY_SPACE, KEY_W]);

        scheme.unbind_fire(FIRE_JUMP);
        assert_eq!(scheme.fire_index(KEY_SPACE), None);
        assert_eq!(scheme.fire_index(KEY_W), None);
    }

    #[test]
    fn test_unbind_code() {
        let mut scheme = ControlScheme::new();
        scheme.bind_fire(FIRE_JUMP, KEY_SPACE);
        scheme.unbind_code(KEY_SPACE);
        assert_eq!(scheme.fire_index(KEY_SPACE), None);
    }

    #[test]
    fn test_clear() {
        let mut scheme = ControlScheme::keyboard_default();
        scheme.clear();
        assert!(scheme.is_empty());
    }

    #[test]
    fn test_keyboard_default_bindings() {
        let scheme = ControlScheme::keyboard_default();
        assert_eq!(scheme.horizontal().len(), 2);
        assert_eq!(scheme.vertical().len(), 2);
        assert_eq!(scheme.fire_index(KEY_SPACE), Some(FIRE_JUMP));
        assert_eq!(scheme.fire_index(KEY_ESCAPE), Some(FIRE_MENU));
    }

    #[test]
    fn test_apply_registers_actions() {
        let mut controller = ControllerModel::new();
        let pad = Rc::new(VirtualPush::new("touch"));
        ControlScheme::keyboard_default()
            .apply(&mut controller, pad.clone())
            .unwrap();

        assert_eq!(controller.device_count(), 1);
        assert_eq!(
            controller.fire_indices(),
            vec![FIRE_JUMP, FIRE_ATTACK, FIRE_SPECIAL, FIRE_MENU]
        );

        pad.press(KEY_D);
        pad.press(KEY_UP);
        pad.press(KEY_J);
        controller.update(DT).unwrap();

        assert_eq!(controller.horizontal_direction(), 1.0);
        assert_eq!(controller.vertical_direction(), 1.0);
        assert_eq!(controller.fired(), Some(FIRE_ATTACK));
    }

    #[test]
    fn test_apply_sums_both_pairs() {
        let mut controller = ControllerModel::new();
        let pad = Rc::new(VirtualPush::new("touch"));
        ControlScheme::keyboard_default()
            .apply(&mut controller, pad.clone())
            .unwrap();

        pad.press(KEY_A);
        pad.press(KEY_LEFT);
        controller.update(DT).unwrap();
        assert_eq!(controller.horizontal_direction(), -2.0);
    }

    #[test]
    fn test_apply_refuses_ambiguous_axis() {
        let mut controller = ControllerModel::new();
        let mut scheme = ControlScheme::new();
        scheme.bind_horizontal(KEY_A, KEY_A);

        let result = scheme.apply(&mut controller, Rc::new(VirtualPush::new("touch")));
        assert!(matches!(result, Err(ControlError::AmbiguousAxis(KEY_A))));
    }

    #[test]
    fn test_keyboard_end_to_end() {
        let mut controller = ControllerModel::new();
        let keyboard = Rc::new(KeyboardPush::with_default_keys("Keyboard"));
        ControlScheme::keyboard_default()
            .apply(&mut controller, keyboard.clone())
            .unwrap();

        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = names.clone();
        controller.add_listener(Rc::new(
            move |name: &str, code: Code, _repr: char, active: bool| {
                sink.borrow_mut().push((name.to_string(), code, active));
            },
        ));

        keyboard.press_key(KeyCode::Space);
        controller.update(DT).unwrap();
        assert!(controller.is_fired_once(FIRE_JUMP));
        assert_eq!(
            names.borrow().as_slice(),
            &[("Keyboard".to_string(), KEY_SPACE, true)]
        );

        keyboard.release_key(KeyCode::Space);
        controller.update(DT).unwrap();
        keyboard.press_key(KeyCode::Space);
        controller.update(DT).unwrap();
        assert!(controller.is_fired_once(FIRE_JUMP));
    }
}
