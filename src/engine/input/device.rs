// Device contracts consumed by the controller

use std::rc::Rc;

/// Raw identifier a device reports for one of its keys or buttons
pub type Code = i32;

/// Callback fired by a device when a tracked code changes state
///
/// `index` identifies which unit of a device family fired (pad number,
/// keyboard slot). `repr` is a printable form of the code, or `'\0'`.
pub trait DeviceListener {
    fn on_state_changed(&self, index: i32, code: Code, repr: char, active: bool);
}

impl<F: Fn(i32, Code, char, bool)> DeviceListener for F {
    fn on_state_changed(&self, index: i32, code: Code, repr: char, active: bool) {
        self(index, code, repr, active)
    }
}

pub type DeviceListenerRef = Rc<dyn DeviceListener>;

/// Any source of input polled once per tick
///
/// Devices are shared between the controller and the actions reading them, so
/// every method takes `&self`; implementations keep their state in cells.
pub trait InputDevice {
    /// Display name, used for disable masks and notifications
    fn name(&self) -> &str;

    fn add_listener(&self, listener: DeviceListenerRef);

    fn remove_listener(&self, listener: &DeviceListenerRef);

    /// Poll the device. An error here is a broken device, not a transient one.
    fn update(&self, dt: f32) -> anyhow::Result<()>;

    /// Show or hide the device, for devices that draw themselves
    fn set_visible(&self, visible: bool);
}

/// A device made of discrete, pushable codes
pub trait DevicePush: InputDevice {
    /// Check if any code is currently pushed
    fn is_any_pushed(&self) -> bool;

    /// The earliest pushed code still held down
    fn pushed(&self) -> Option<Code>;

    fn is_pushed(&self, code: Code) -> bool;

    /// True once per press; further calls return false until the code is
    /// released and pushed again
    fn is_pushed_once(&self, code: Code) -> bool;
}

pub type DeviceRef = Rc<dyn InputDevice>;
pub type PushRef = Rc<dyn DevicePush>;

/// Identity comparison for shared devices
pub fn same_device(a: &DeviceRef, b: &DeviceRef) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Printable form of a code, `'\0'` when the code is not a visible character
pub fn code_char(code: Code) -> char {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .filter(|c| !c.is_control())
        .unwrap_or('\0')
}
