// Input handling system
//
// This module turns any number of input devices into one small control
// surface: a horizontal axis, a vertical axis, and indexed fire actions with
// edge-triggered "fired once" reads.
//
// ## Architecture
//
// - `device`: Device contracts (`InputDevice`, `DevicePush`, listeners)
// - `action`: Scalar reads out of a device (digital axis, button, analog)
// - `controller`: The `DeviceController` trait and its aggregator
// - `delegate`: Forwarding to the currently active controller
// - `void`: A controller that ignores all input
// - `virtual_push`: Software-driven push device
// - `keyboard`: Push device fed by winit key events
// - `config`: Control schemes binding codes to axes and fire indices
//
// ## Usage Example
//
// ```rust
// use engine::input::{ControlScheme, ControllerModel, DeviceController, KeyboardPush};
//
// let keyboard = Rc::new(KeyboardPush::with_default_keys("Keyboard"));
// let mut controller = ControllerModel::new();
// ControlScheme::keyboard_default().apply(&mut controller, keyboard.clone())?;
//
// // In your event loop, feed keyboard events
// keyboard.process_event(&key_event);
//
// // Once per tick
// controller.update(dt)?;
//
// let (horizontal, vertical) = (controller.horizontal_direction(), controller.vertical_direction());
// if controller.is_fired_once(FIRE_JUMP) {
//     // Jump pressed this tick
// }
// ```
//
// Everything here is single-threaded and poll-driven: devices and actions are
// shared through `Rc` and read between `update` calls on the game loop thread.

pub mod action;
pub mod config;
pub mod controller;
pub mod delegate;
pub mod device;
pub mod keyboard;
pub mod listener;
mod push_state;
pub mod virtual_push;
pub mod void;

// Re-export commonly used types
pub use action::{Action, ActionRef, AnalogAction, ButtonAction, DigitalAxisAction};
pub use config::{
    AxisBinding, ControlScheme, FireBinding, FIRE_ATTACK, FIRE_JUMP, FIRE_MENU, FIRE_SPECIAL,
};
pub use controller::{
    ControllerListenerRef, ControllerModel, DeviceController, DeviceControllerListener, DeviceId,
    FireIndex, SharedController,
};
pub use delegate::ControllerDelegate;
pub use device::{
    Code, DeviceListener, DeviceListenerRef, DevicePush, DeviceRef, InputDevice, PushRef,
};
pub use keyboard::KeyboardPush;
pub use listener::ListenerList;
pub use push_state::PushState;
pub use virtual_push::VirtualPush;
pub use void::VoidController;

/// Controller registration and update errors
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Input device has an empty name")]
    UnnamedDevice,

    #[error("Fire binding for index {0} has an empty name")]
    UnnamedFire(FireIndex),

    #[error("Axis action uses code {0} for both directions")]
    AmbiguousAxis(Code),

    #[error("Input device '{device}' failed to update")]
    DeviceUpdate {
        device: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::AmbiguousAxis(65);
        assert_eq!(err.to_string(), "Axis action uses code 65 for both directions");
    }

    #[test]
    fn test_device_update_error_keeps_source() {
        use std::error::Error;

        let err = ControlError::DeviceUpdate {
            device: "pad".to_string(),
            source: anyhow::anyhow!("cable unplugged"),
        };
        assert_eq!(err.to_string(), "Input device 'pad' failed to update");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("cable unplugged".to_string())
        );
    }
}
