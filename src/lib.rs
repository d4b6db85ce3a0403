// Rusted Controls - input aggregation for the Rusted Battle engine
//
// Gameplay code reads two axes and a handful of indexed fire actions.
// Everything behind that surface (keyboards, pads, on-screen buttons) is
// registered into a `DeviceController` and polled once per tick.

pub mod core;
pub mod engine;

pub use engine::input::{
    Action, ControlError, ControlScheme, ControllerDelegate, ControllerModel, DeviceController,
    DevicePush, InputDevice, KeyboardPush, VirtualPush, VoidController,
};
